// Scripted keyboard for unit tests

use std::collections::{HashMap, HashSet};

use crate::keyboard::{ComposeStatus, KeyDirection, KeyState, Keyboard, Keysym};
use crate::keycode::XkbKeycode;
use crate::Key;

/// What a fake key produces on one level
#[derive(Debug, Clone, Copy)]
pub enum Sym {
    Char(char),
    Dead(u32, &'static str),
    Control(u32, u8),
    Text(u32, &'static str),
}

impl Sym {
    fn keysym(self) -> Keysym {
        match self {
            Sym::Char(c) if (' '..='~').contains(&c) => Keysym(c as u32),
            Sym::Char(c) => Keysym(0x0100_0000 | c as u32),
            Sym::Dead(sym, _) | Sym::Control(sym, _) | Sym::Text(sym, _) => Keysym(sym),
        }
    }

    fn utf8(self) -> String {
        match self {
            Sym::Char(c) => c.to_string(),
            Sym::Dead(..) => String::new(),
            Sym::Control(_, b) => (b as char).to_string(),
            Sym::Text(_, s) => s.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct FakeKey {
    /// base, shift, altgr, shift+altgr
    levels: Vec<Option<Sym>>,
    alphabetic: bool,
}

#[derive(Debug, Default)]
pub struct FakeKeyboard {
    keys: HashMap<XkbKeycode, FakeKey>,
    held: HashSet<XkbKeycode>,
    capslock: bool,
    numlock: bool,
    pub transitions: Vec<(Key, KeyDirection)>,
    pub compose_queries: usize,
}

impl FakeKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: Key, levels: &[Option<Sym>]) -> Self {
        self.keys.insert(
            key.into(),
            FakeKey {
                levels: levels.to_vec(),
                alphabetic: false,
            },
        );
        self
    }

    pub fn letter(mut self, key: Key, lower: char, upper: char) -> Self {
        self.keys.insert(
            key.into(),
            FakeKey {
                levels: vec![Some(Sym::Char(lower)), Some(Sym::Char(upper))],
                alphabetic: true,
            },
        );
        self
    }

    /// A small US-like layout with one dead key and the control keys
    pub fn us_like() -> Self {
        use Sym::*;
        Self::new()
            .letter(Key::A, 'a', 'A')
            .letter(Key::Q, 'q', 'Q')
            .key(
                Key::E,
                &[Some(Char('e')), Some(Char('E')), Some(Char('€')), None],
            )
            .key(Key::KEY_1, &[Some(Char('1')), Some(Char('!'))])
            .key(
                Key::GRAVE,
                &[Some(Dead(0xfe50, "dead_grave")), Some(Char('~'))],
            )
            .key(Key::SPACE, &[Some(Char(' ')), Some(Char(' '))])
            .key(Key::ESC, &[Some(Control(0xff1b, 27))])
            .key(Key::BACKSPACE, &[Some(Control(0xff08, 8))])
            .key(Key::TAB, &[Some(Control(0xff09, 9))])
            .key(Key::ENTER, &[Some(Control(0xff0d, 13))])
            .key(Key::KPENTER, &[Some(Control(0xff8d, 13))])
            .key(Key::DELETE, &[Some(Control(0xffff, 127))])
    }

    pub fn capslock(&self) -> bool {
        self.capslock
    }

    pub fn numlock(&self) -> bool {
        self.numlock
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    fn current(&self, keycode: XkbKeycode) -> Option<Sym> {
        let key = self.keys.get(&keycode)?;
        let mut shift = self.held.contains(&XkbKeycode::from(Key::LEFTSHIFT));
        if key.alphabetic && self.capslock {
            shift = !shift;
        }
        let altgr = self.held.contains(&XkbKeycode::from(Key::RIGHTALT));
        let level = usize::from(shift) + 2 * usize::from(altgr);
        key.levels.get(level).copied().flatten()
    }
}

impl KeyState for FakeKeyboard {
    fn update_key(&mut self, keycode: XkbKeycode, direction: KeyDirection) {
        let key = Key((keycode.raw() - crate::keycode::EVDEV_OFFSET) as u16);
        self.transitions.push((key, direction));
        match direction {
            KeyDirection::Down => {
                if key == Key::CAPSLOCK {
                    self.capslock = !self.capslock;
                }
                if key == Key::NUMLOCK {
                    self.numlock = !self.numlock;
                }
                self.held.insert(keycode);
            }
            KeyDirection::Up => {
                self.held.remove(&keycode);
            }
        }
    }
}

impl Keyboard for FakeKeyboard {
    fn key_one_sym(&self, keycode: XkbKeycode) -> Keysym {
        self.current(keycode)
            .map(Sym::keysym)
            .unwrap_or(Keysym::NO_SYMBOL)
    }

    fn key_utf8(&self, keycode: XkbKeycode) -> String {
        self.current(keycode).map(Sym::utf8).unwrap_or_default()
    }

    fn query_compose(&mut self, keysym: Keysym) -> ComposeStatus {
        self.compose_queries += 1;
        if (0xfe50..=0xfe8f).contains(&keysym.raw()) {
            ComposeStatus::Composing
        } else {
            ComposeStatus::Nothing
        }
    }

    fn keysym_name(&self, keysym: Keysym) -> String {
        self.keys
            .values()
            .flat_map(|k| k.levels.iter().flatten())
            .find_map(|s| match s {
                Sym::Dead(sym, name) if *sym == keysym.raw() => Some(name.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| format!("0x{:x}", keysym.raw()))
    }

    fn keysym_utf8(&self, keysym: Keysym) -> String {
        self.keys
            .values()
            .flat_map(|k| k.levels.iter().flatten())
            .find(|s| s.keysym() == keysym)
            .map(|s| s.utf8())
            .unwrap_or_default()
    }

    fn num_levels(&self, keycode: XkbKeycode) -> u32 {
        self.keys
            .get(&keycode)
            .map(|k| k.levels.len() as u32)
            .unwrap_or(0)
    }

    fn level_syms(&self, keycode: XkbKeycode, level: u32) -> Vec<Keysym> {
        self.keys
            .get(&keycode)
            .and_then(|k| k.levels.get(level as usize).copied().flatten())
            .map(|s| vec![s.keysym()])
            .unwrap_or_default()
    }

    fn keymap_text(&self) -> String {
        "xkb_keymap {\n};".to_string()
    }
}
