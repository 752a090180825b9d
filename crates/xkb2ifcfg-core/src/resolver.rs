// xkb2ifcfg Per-Key Resolver
// Resolves the character a key produces in the current keyboard state

use smallvec::SmallVec;

use crate::keyboard::{Keyboard, Keysym};
use crate::keycode::KeyMapping;
use crate::Key;

/// Maximum number of UTF-8 bytes emitted per key
pub const MAX_CHAR_BYTES: usize = 6;

/// UTF-8 bytes of the character a key produces, in order
pub type CharBytes = SmallVec<[u8; MAX_CHAR_BYTES]>;

const CARRIAGE_RETURN: u8 = 13;
const LINE_FEED: u8 = 10;

/// One `<key>` entry of a chargen map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Printable key with its character as ordered bytes (`b0`, `b1`, ...)
    Character { key: Key, bytes: CharBytes },
    /// Non-printable key with a single effect byte (`ascii`)
    Effect { key: Key, byte: u8 },
}

impl Entry {
    pub fn key(&self) -> Key {
        match self {
            Entry::Character { key, .. } | Entry::Effect { key, .. } => *key,
        }
    }

    /// Decoded character text of a character entry
    pub fn text(&self) -> Option<&str> {
        match self {
            Entry::Character { bytes, .. } => std::str::from_utf8(bytes).ok(),
            Entry::Effect { .. } => None,
        }
    }
}

/// Outcome of resolving one printable key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Entry(Entry),
    /// The key's symbol starts a multi-key composition (dead key)
    Composing(Keysym),
    /// The key produces nothing in this state
    Nothing,
}

/// Effect byte reported for the ENTER keys.
///
/// libxkbcommon yields carriage return (13) where the input filter
/// convention is line feed (10). Consumers may depend on either value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnterByte {
    /// Keep whatever the layout produces
    #[default]
    AsProduced,
    /// Report carriage return as line feed
    LineFeed,
}

/// Encode `text` into at most [`MAX_CHAR_BYTES`] bytes, never splitting a character
pub fn encode_utf8(text: &str) -> CharBytes {
    let mut end = 0;
    for (idx, c) in text.char_indices() {
        let next = idx + c.len_utf8();
        if next > MAX_CHAR_BYTES {
            log::debug!("truncating {:?} to {} bytes", text, end);
            break;
        }
        end = next;
    }
    SmallVec::from_slice(&text.as_bytes()[..end])
}

/// Resolve the character `mapping` produces in the keyboard's current state
pub fn resolve_printable<K: Keyboard + ?Sized>(kb: &mut K, mapping: &KeyMapping) -> Resolution {
    let keysym = kb.key_one_sym(mapping.xkb);
    if !keysym.is_no_symbol() && kb.keysym_composing(keysym) {
        return Resolution::Composing(keysym);
    }

    let bytes = encode_utf8(&kb.key_utf8(mapping.xkb));
    if bytes.is_empty() {
        return Resolution::Nothing;
    }

    log::trace!("{} -> {:?}", mapping.key, bytes);
    Resolution::Entry(Entry::Character {
        key: mapping.key,
        bytes,
    })
}

/// Resolve the effect byte of a non-printable key (0 if the key yields nothing)
pub fn resolve_non_printable<K: Keyboard + ?Sized>(
    kb: &K,
    mapping: &KeyMapping,
    enter: EnterByte,
) -> Entry {
    let mut byte = kb.key_utf8(mapping.xkb).bytes().next().unwrap_or(0);

    let is_enter = mapping.key == Key::ENTER || mapping.key == Key::KPENTER;
    if is_enter && enter == EnterByte::LineFeed && byte == CARRIAGE_RETURN {
        log::debug!("reporting {} as line feed", mapping.key);
        byte = LINE_FEED;
    }

    Entry::Effect {
        key: mapping.key,
        byte,
    }
}
