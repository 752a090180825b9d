// xkb2ifcfg Per-Key Info
// Lists the shift levels and symbols of every printable key

use std::io;

use crate::keyboard::Keyboard;
use crate::keycode::{KeyMapping, PRINTABLE};

/// Marker printed instead of the text of a composing symbol
pub const COMPOSING_MARKER: &str = "COMPOSING!";

/// One info line for `mapping` (without trailing newline)
pub fn key_info<K: Keyboard + ?Sized>(kb: &mut K, mapping: &KeyMapping) -> String {
    let num_levels = kb.num_levels(mapping.xkb);

    let mut line = format!(
        "keycode {:3}: {:<8} {:<16}\t{} levels {{ ",
        mapping.xkb.raw(),
        mapping.xkb_name,
        mapping.key.name(),
        num_levels
    );

    for level in 0..num_levels {
        line.push_str(&format!(" {}:", level));
        for keysym in kb.level_syms(mapping.xkb, level) {
            let text = if kb.keysym_composing(keysym) {
                COMPOSING_MARKER.to_string()
            } else {
                kb.keysym_utf8(keysym)
            };
            line.push_str(&format!(" {:x} {}", keysym, text));
        }
    }
    line.push_str(" }");
    line
}

/// Write one info line per printable key in table order
pub fn write_info<K, W>(kb: &mut K, out: &mut W) -> io::Result<()>
where
    K: Keyboard + ?Sized,
    W: io::Write + ?Sized,
{
    for mapping in PRINTABLE.iter() {
        writeln!(out, "{}", key_info(kb, mapping))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::{lookup_printable, XkbKeycode};
    use crate::testing::FakeKeyboard;
    use crate::Key;

    fn mapping(key: Key) -> &'static KeyMapping {
        lookup_printable(XkbKeycode::from(key)).unwrap()
    }

    #[test]
    fn test_letter_line() {
        let mut kb = FakeKeyboard::us_like();
        assert_eq!(
            key_info(&mut kb, mapping(Key::A)),
            "keycode  38: <AC01>   KEY_A           \t2 levels {  0: 61 a 1: 41 A }"
        );
    }

    #[test]
    fn test_composing_marker() {
        let mut kb = FakeKeyboard::us_like();
        assert_eq!(
            key_info(&mut kb, mapping(Key::GRAVE)),
            "keycode  49: <TLDE>   KEY_GRAVE       \t2 levels {  0: fe50 COMPOSING! 1: 7e ~ }"
        );
    }

    #[test]
    fn test_empty_level_and_unmapped_key() {
        let mut kb = FakeKeyboard::us_like();
        let line = key_info(&mut kb, mapping(Key::E));
        assert!(line.ends_with("\t4 levels {  0: 65 e 1: 45 E 2: 10020ac € 3: }"));

        let line = key_info(&mut kb, mapping(Key::Z));
        assert!(line.ends_with("\t0 levels {  }"));
    }

    #[test]
    fn test_one_line_per_printable_key() {
        let mut kb = FakeKeyboard::us_like();
        let mut out = Vec::new();
        write_info(&mut kb, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), PRINTABLE.len());
        assert!(lines.iter().all(|l| l.starts_with("keycode ") && l.contains(" levels { ")));
        assert!(lines[0].starts_with("keycode  10: <AE01>   KEY_1 "));
    }
}
