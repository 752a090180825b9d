// xkb2ifcfg Keyboard Abstraction
// Compiled keymap, abstract keyboard state and compose state behind one seam

use std::fmt;

use crate::keycode::XkbKeycode;

/// Direction of a key transition fed into the keyboard state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Down,
    Up,
}

/// An opaque keysym value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Keysym(pub u32);

impl Keysym {
    pub const NO_SYMBOL: Keysym = Keysym(0);

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn is_no_symbol(self) -> bool {
        self == Self::NO_SYMBOL
    }
}

impl fmt::LowerHex for Keysym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Status of the compose state after feeding a keysym
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeStatus {
    Nothing,
    Composing,
    Composed,
    Cancelled,
}

/// Mutable keyboard state driven by key transitions.
///
/// This is the only way modifiers are activated; see [`crate::modifier`].
pub trait KeyState {
    fn update_key(&mut self, keycode: XkbKeycode, direction: KeyDirection);
}

/// A compiled layout together with its state and compose table.
pub trait Keyboard: KeyState {
    /// The single keysym the key produces in the current state, or `NO_SYMBOL`
    fn key_one_sym(&self, keycode: XkbKeycode) -> Keysym;

    /// UTF-8 text the key produces in the current state (may be empty)
    fn key_utf8(&self, keycode: XkbKeycode) -> String;

    /// Reset the compose state, feed `keysym` and report the resulting status
    fn query_compose(&mut self, keysym: Keysym) -> ComposeStatus;

    fn keysym_name(&self, keysym: Keysym) -> String;

    fn keysym_utf8(&self, keysym: Keysym) -> String;

    /// Number of shift levels of the key in the first layout
    fn num_levels(&self, keycode: XkbKeycode) -> u32;

    /// Keysyms of one shift level of the key in the first layout
    fn level_syms(&self, keycode: XkbKeycode, level: u32) -> Vec<Keysym>;

    /// Textual representation of the compiled keymap
    fn keymap_text(&self) -> String;

    /// Whether `keysym` would start a multi-key composition
    fn keysym_composing(&mut self, keysym: Keysym) -> bool {
        self.query_compose(keysym) == ComposeStatus::Composing
    }
}
