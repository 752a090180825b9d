// xkb2ifcfg Keycode Translation
// Bridges XKB keycodes and internal key identifiers for the pc105 arrangement

use std::fmt;

use crate::Key;

/// A keycode in the XKB numbering scheme.
///
/// XKB keycodes are evdev keycodes shifted by 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct XkbKeycode(pub u32);

/// Offset between evdev and XKB keycodes
pub const EVDEV_OFFSET: u32 = 8;

impl XkbKeycode {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl From<Key> for XkbKeycode {
    fn from(key: Key) -> Self {
        XkbKeycode(u32::from(key.code()) + EVDEV_OFFSET)
    }
}

impl fmt::Display for XkbKeycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lookup table entry for keys eventually generating characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMapping {
    pub xkb: XkbKeycode,
    pub xkb_name: &'static str,
    pub key: Key,
}

impl KeyMapping {
    const fn new(xkb: u32, xkb_name: &'static str, key: Key) -> Self {
        Self {
            xkb: XkbKeycode(xkb),
            xkb_name,
            key,
        }
    }
}

/// Which table a mapping was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    Printable,
    NonPrintable,
}

/// Keys expected to produce a character in at least one modifier state
pub static PRINTABLE: [KeyMapping; 64] = [
    KeyMapping::new(10, "<AE01>", Key::KEY_1),
    KeyMapping::new(11, "<AE02>", Key::KEY_2),
    KeyMapping::new(12, "<AE03>", Key::KEY_3),
    KeyMapping::new(13, "<AE04>", Key::KEY_4),
    KeyMapping::new(14, "<AE05>", Key::KEY_5),
    KeyMapping::new(15, "<AE06>", Key::KEY_6),
    KeyMapping::new(16, "<AE07>", Key::KEY_7),
    KeyMapping::new(17, "<AE08>", Key::KEY_8),
    KeyMapping::new(18, "<AE09>", Key::KEY_9),
    KeyMapping::new(19, "<AE10>", Key::KEY_0),
    KeyMapping::new(20, "<AE11>", Key::MINUS),
    KeyMapping::new(21, "<AE12>", Key::EQUAL),
    KeyMapping::new(24, "<AD01>", Key::Q),
    KeyMapping::new(25, "<AD02>", Key::W),
    KeyMapping::new(26, "<AD03>", Key::E),
    KeyMapping::new(27, "<AD04>", Key::R),
    KeyMapping::new(28, "<AD05>", Key::T),
    KeyMapping::new(29, "<AD06>", Key::Y),
    KeyMapping::new(30, "<AD07>", Key::U),
    KeyMapping::new(31, "<AD08>", Key::I),
    KeyMapping::new(32, "<AD09>", Key::O),
    KeyMapping::new(33, "<AD10>", Key::P),
    KeyMapping::new(34, "<AD11>", Key::LEFTBRACE),
    KeyMapping::new(35, "<AD12>", Key::RIGHTBRACE),
    KeyMapping::new(38, "<AC01>", Key::A),
    KeyMapping::new(39, "<AC02>", Key::S),
    KeyMapping::new(40, "<AC03>", Key::D),
    KeyMapping::new(41, "<AC04>", Key::F),
    KeyMapping::new(42, "<AC05>", Key::G),
    KeyMapping::new(43, "<AC06>", Key::H),
    KeyMapping::new(44, "<AC07>", Key::J),
    KeyMapping::new(45, "<AC08>", Key::K),
    KeyMapping::new(46, "<AC09>", Key::L),
    KeyMapping::new(47, "<AC11>", Key::SEMICOLON),
    KeyMapping::new(48, "<AC12>", Key::APOSTROPHE),
    // left of <AE01>
    KeyMapping::new(49, "<TLDE>", Key::GRAVE),
    // left of <RTRN> (pc105), above <RTRN> (pc104)
    KeyMapping::new(51, "<BKSL>", Key::BACKSLASH),
    KeyMapping::new(52, "<AB01>", Key::Z),
    KeyMapping::new(53, "<AB02>", Key::X),
    KeyMapping::new(54, "<AB03>", Key::C),
    KeyMapping::new(55, "<AB04>", Key::V),
    KeyMapping::new(56, "<AB05>", Key::B),
    KeyMapping::new(57, "<AB06>", Key::N),
    KeyMapping::new(58, "<AB07>", Key::M),
    KeyMapping::new(59, "<AB08>", Key::COMMA),
    KeyMapping::new(60, "<AB09>", Key::DOT),
    KeyMapping::new(61, "<AB10>", Key::SLASH),
    KeyMapping::new(65, "<SPCE>", Key::SPACE),
    // right of <LFSH> (pc105)
    KeyMapping::new(94, "<LSGT>", Key::KEY_102ND),
    KeyMapping::new(63, "<KPMU>", Key::KPASTERISK),
    KeyMapping::new(79, "<KP7>", Key::KP7),
    KeyMapping::new(80, "<KP8>", Key::KP8),
    KeyMapping::new(81, "<KP9>", Key::KP9),
    KeyMapping::new(82, "<KPSU>", Key::KPMINUS),
    KeyMapping::new(83, "<KP4>", Key::KP4),
    KeyMapping::new(84, "<KP5>", Key::KP5),
    KeyMapping::new(85, "<KP6>", Key::KP6),
    KeyMapping::new(86, "<KPAD>", Key::KPPLUS),
    KeyMapping::new(87, "<KP1>", Key::KP1),
    KeyMapping::new(88, "<KP2>", Key::KP2),
    KeyMapping::new(89, "<KP3>", Key::KP3),
    KeyMapping::new(90, "<KP0>", Key::KP0),
    KeyMapping::new(91, "<KPDL>", Key::KPDOT),
    KeyMapping::new(106, "<KPDV>", Key::KPSLASH),
];

/// Keys with a single chargen effect byte (e.g., ENTER)
pub static NON_PRINTABLE: [KeyMapping; 6] = [
    KeyMapping::new(9, "<ESC>", Key::ESC),
    KeyMapping::new(22, "<BKSP>", Key::BACKSPACE),
    KeyMapping::new(23, "<TAB>", Key::TAB),
    KeyMapping::new(36, "<RTRN>", Key::ENTER),
    KeyMapping::new(104, "<KPEN>", Key::KPENTER),
    KeyMapping::new(119, "<DELE>", Key::DELETE),
];

/// Find the printable mapping for an XKB keycode
pub fn lookup_printable(xkb: XkbKeycode) -> Option<&'static KeyMapping> {
    PRINTABLE.iter().find(|m| m.xkb == xkb)
}

/// Find the non-printable mapping for an XKB keycode
pub fn lookup_non_printable(xkb: XkbKeycode) -> Option<&'static KeyMapping> {
    NON_PRINTABLE.iter().find(|m| m.xkb == xkb)
}

/// Find a mapping in either table.
///
/// Returns `None` for keys without a character-producing role; callers skip those.
pub fn lookup(xkb: XkbKeycode) -> Option<(KeyClass, &'static KeyMapping)> {
    lookup_printable(xkb)
        .map(|m| (KeyClass::Printable, m))
        .or_else(|| lookup_non_printable(xkb).map(|m| (KeyClass::NonPrintable, m)))
}
