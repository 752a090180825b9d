// xkb2ifcfg Core Library
// Generates input filter chargen configurations from XKB layouts

pub mod chargen;
pub mod command;
pub mod error;
pub mod info;
pub mod key;
pub mod keyboard;
pub mod keycode;
pub mod modifier;
pub mod resolver;
pub mod settings;
pub mod xml;

#[cfg(feature = "xkb")]
pub mod xkb;

// Scripted keyboard shared by the unit tests
#[cfg(test)]
mod testing;

pub use chargen::{CharMap, Chargen, ComposingKey, Options};
pub use command::{run, Command, LayoutSpec};
pub use error::{Error, Result};
pub use key::Key;
pub use keyboard::{ComposeStatus, KeyDirection, KeyState, Keyboard, Keysym};
pub use keycode::{KeyClass, KeyMapping, XkbKeycode, NON_PRINTABLE, PRINTABLE};
pub use modifier::{Locked, ModifierCombination, Pressed};
pub use resolver::{CharBytes, EnterByte, Entry, Resolution, MAX_CHAR_BYTES};
pub use settings::{Settings, SettingsError, XkbSettings};
pub use xml::{BufferExceeded, ExpandingXmlBuffer, XmlGenerator};

#[cfg(feature = "xkb")]
pub use xkb::XkbKeyboard;
