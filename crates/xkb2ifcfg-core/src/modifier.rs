// xkb2ifcfg Modifier System
// The eight modifier combinations and scoped press/latch activation

use std::ops::{Deref, DerefMut};

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::keyboard::{KeyDirection, KeyState};
use crate::keycode::XkbKeycode;
use crate::Key;

/// Key held for the SHIFT modifier
pub const SHIFT_KEY: Key = Key::LEFTSHIFT;
/// Key held for the ALTGR modifier
pub const ALTGR_KEY: Key = Key::RIGHTALT;
/// Key latched for the CAPSLOCK modifier
pub const CAPSLOCK_KEY: Key = Key::CAPSLOCK;
/// Key latched for the whole run
pub const NUMLOCK_KEY: Key = Key::NUMLOCK;

/// Modifier bits as understood by the input filter (mod2 is CTRL and unused here)
pub const MOD1_SHIFT: u8 = 1;
pub const MOD3_ALTGR: u8 = 4;
pub const MOD4_CAPSLOCK: u8 = 8;

/// One of the eight supported modifier combinations.
///
/// Declaration order is the order maps appear in the chargen document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ModifierCombination {
    #[strum(to_string = "no modifier")]
    None,
    #[strum(to_string = "SHIFT")]
    Shift,
    #[strum(to_string = "ALTGR")]
    AltGr,
    #[strum(to_string = "CAPSLOCK")]
    CapsLock,
    #[strum(to_string = "SHIFT-ALTGR")]
    ShiftAltGr,
    #[strum(to_string = "SHIFT-CAPSLOCK")]
    ShiftCapsLock,
    #[strum(to_string = "ALTGR-CAPSLOCK")]
    AltGrCapsLock,
    #[strum(to_string = "SHIFT-ALTGR-CAPSLOCK")]
    ShiftAltGrCapsLock,
}

impl ModifierCombination {
    /// All combinations in document order
    pub fn all() -> impl Iterator<Item = ModifierCombination> {
        Self::iter()
    }

    /// Union of the `MOD*` bits of this combination
    pub const fn bits(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Shift => MOD1_SHIFT,
            Self::AltGr => MOD3_ALTGR,
            Self::CapsLock => MOD4_CAPSLOCK,
            Self::ShiftAltGr => MOD1_SHIFT | MOD3_ALTGR,
            Self::ShiftCapsLock => MOD1_SHIFT | MOD4_CAPSLOCK,
            Self::AltGrCapsLock => MOD3_ALTGR | MOD4_CAPSLOCK,
            Self::ShiftAltGrCapsLock => MOD1_SHIFT | MOD3_ALTGR | MOD4_CAPSLOCK,
        }
    }

    pub const fn is_none(self) -> bool {
        self.bits() == 0
    }

    pub const fn shift(self) -> bool {
        self.bits() & MOD1_SHIFT != 0
    }

    pub const fn altgr(self) -> bool {
        self.bits() & MOD3_ALTGR != 0
    }

    pub const fn capslock(self) -> bool {
        self.bits() & MOD4_CAPSLOCK != 0
    }

    /// The `mod1`/`mod3`/`mod4` attributes of a conditioned map
    pub fn attributes(self) -> [(&'static str, bool); 3] {
        [
            ("mod1", self.shift()),
            ("mod3", self.altgr()),
            ("mod4", self.capslock()),
        ]
    }
}

/// Press-type modifier: key down while the guard lives, key up on drop
pub struct Pressed<'a, S: KeyState + ?Sized> {
    state: &'a mut S,
    keycode: XkbKeycode,
}

impl<'a, S: KeyState + ?Sized> Pressed<'a, S> {
    pub fn new(state: &'a mut S, key: Key) -> Self {
        let keycode = XkbKeycode::from(key);
        state.update_key(keycode, KeyDirection::Down);
        Self { state, keycode }
    }
}

impl<S: KeyState + ?Sized> Drop for Pressed<'_, S> {
    fn drop(&mut self) {
        self.state.update_key(self.keycode, KeyDirection::Up);
    }
}

impl<S: KeyState + ?Sized> Deref for Pressed<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.state
    }
}

impl<S: KeyState + ?Sized> DerefMut for Pressed<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.state
    }
}

/// Latch-type modifier: a full tap toggles the latch on, another tap on drop
/// toggles it off again
pub struct Locked<'a, S: KeyState + ?Sized> {
    state: &'a mut S,
    keycode: XkbKeycode,
}

impl<'a, S: KeyState + ?Sized> Locked<'a, S> {
    pub fn new(state: &'a mut S, key: Key) -> Self {
        let keycode = XkbKeycode::from(key);
        tap(state, keycode);
        Self { state, keycode }
    }
}

impl<S: KeyState + ?Sized> Drop for Locked<'_, S> {
    fn drop(&mut self) {
        tap(&mut *self.state, self.keycode);
    }
}

impl<S: KeyState + ?Sized> Deref for Locked<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.state
    }
}

impl<S: KeyState + ?Sized> DerefMut for Locked<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.state
    }
}

fn tap<S: KeyState + ?Sized>(state: &mut S, keycode: XkbKeycode) {
    state.update_key(keycode, KeyDirection::Down);
    state.update_key(keycode, KeyDirection::Up);
}

/// Run `f` with the latched modifiers of `combination` active.
///
/// Wraps a whole pass over the keys; held modifiers are entered per key
/// inside it with [`with_held`].
pub fn with_latched<S, R, F>(state: &mut S, combination: ModifierCombination, f: F) -> R
where
    S: KeyState + ?Sized,
    F: FnOnce(&mut S) -> R,
{
    if combination.capslock() {
        let mut capslock = Locked::new(state, CAPSLOCK_KEY);
        f(&mut *capslock)
    } else {
        f(state)
    }
}

/// Run `f` with the held modifiers of `combination` pressed.
///
/// Shift goes down before AltGr and comes up after it.
pub fn with_held<S, R, F>(state: &mut S, combination: ModifierCombination, f: F) -> R
where
    S: KeyState + ?Sized,
    F: FnOnce(&mut S) -> R,
{
    match (combination.shift(), combination.altgr()) {
        (false, false) => f(state),
        (true, false) => {
            let mut shift = Pressed::new(state, SHIFT_KEY);
            f(&mut *shift)
        }
        (false, true) => {
            let mut altgr = Pressed::new(state, ALTGR_KEY);
            f(&mut *altgr)
        }
        (true, true) => {
            let mut shift = Pressed::new(state, SHIFT_KEY);
            let mut altgr = Pressed::new(&mut *shift, ALTGR_KEY);
            f(&mut *altgr)
        }
    }
}
