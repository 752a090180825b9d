// xkb2ifcfg Run Modes
// generate, dump and info over a compiled keyboard

use std::fmt;
use std::io::Write;

use strum_macros::{Display, EnumString};

use crate::chargen::{Chargen, Options};
use crate::error::Result;
use crate::info::write_info;
use crate::keyboard::Keyboard;
use crate::modifier::{Locked, NUMLOCK_KEY};
use crate::settings::Settings;

/// Layout, variant and locale a keyboard is compiled from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutSpec {
    pub layout: String,
    /// May be empty for the layout's default variant
    pub variant: String,
    pub locale: String,
}

impl LayoutSpec {
    pub fn new(
        layout: impl Into<String>,
        variant: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            layout: layout.into(),
            variant: variant.into(),
            locale: locale.into(),
        }
    }
}

impl fmt::Display for LayoutSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.layout, self.variant, self.locale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    /// Generate the input filter chargen configuration
    Generate,
    /// Dump the raw XKB keymap
    Dump,
    /// Simple per-key information
    Info,
}

/// Run `command` against `kb`, writing its output to `out`.
///
/// NumLock is latched for the whole run.
pub fn run<K, W>(
    command: Command,
    kb: &mut K,
    spec: &LayoutSpec,
    settings: &Settings,
    out: &mut W,
) -> Result<()>
where
    K: Keyboard + ?Sized,
    W: Write + ?Sized,
{
    let mut kb = Locked::new(kb, NUMLOCK_KEY);

    match command {
        Command::Generate => {
            let chargen = generate(&mut *kb, spec, &Options::from(settings), out)?;
            if !chargen.composing().is_empty() {
                log::info!(
                    "{} composing keys skipped for {}",
                    chargen.composing().len(),
                    spec
                );
            }
        }
        Command::Dump => dump(&*kb, spec, out)?,
        Command::Info => info(&mut *kb, spec, out)?,
    }

    out.flush()?;
    Ok(())
}

/// Write the header comment and the chargen document
pub fn generate<K, W>(kb: &mut K, spec: &LayoutSpec, options: &Options, out: &mut W) -> Result<Chargen>
where
    K: Keyboard + ?Sized,
    W: Write + ?Sized,
{
    let chargen = Chargen::assemble(kb, options);
    writeln!(
        out,
        "<!-- {} chargen configuration generated by xkb2ifcfg -->",
        spec
    )?;
    writeln!(out, "{}", chargen.to_xml(options))?;
    Ok(chargen)
}

/// Write the header line and the textual keymap
pub fn dump<K, W>(kb: &K, spec: &LayoutSpec, out: &mut W) -> Result<()>
where
    K: Keyboard + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "Dump of XKB keymap for {} by xkb2ifcfg", spec)?;
    writeln!(out, "{}", kb.keymap_text())?;
    Ok(())
}

/// Write the header line and one line per printable key
pub fn info<K, W>(kb: &mut K, spec: &LayoutSpec, out: &mut W) -> Result<()>
where
    K: Keyboard + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "Simple per-key info for {} by xkb2ifcfg", spec)?;
    write_info(kb, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::KeyDirection;
    use crate::keycode::PRINTABLE;
    use crate::testing::FakeKeyboard;
    use crate::Key;

    fn us() -> LayoutSpec {
        LayoutSpec::new("us", "", "en_US.UTF-8")
    }

    fn run_to_string(command: Command, kb: &mut FakeKeyboard) -> String {
        let mut out = Vec::new();
        run(command, kb, &us(), &Settings::new(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_layout_spec_display() {
        assert_eq!(us().to_string(), "us--en_US.UTF-8");
        assert_eq!(
            LayoutSpec::new("de", "nodeadkeys", "de_DE.UTF-8").to_string(),
            "de-nodeadkeys-de_DE.UTF-8"
        );
    }

    #[test]
    fn test_command_names() {
        assert_eq!("generate".parse::<Command>().unwrap(), Command::Generate);
        assert_eq!("dump".parse::<Command>().unwrap(), Command::Dump);
        assert_eq!("info".parse::<Command>().unwrap(), Command::Info);
        assert!("Generate".parse::<Command>().is_err());
        assert_eq!(Command::Info.to_string(), "info");
    }

    #[test]
    fn test_generate_output() {
        let mut kb = FakeKeyboard::us_like();
        let text = run_to_string(Command::Generate, &mut kb);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("<!-- us--en_US.UTF-8 chargen configuration generated by xkb2ifcfg -->")
        );
        assert_eq!(lines.next(), Some("<chargen>"));
        assert!(text.ends_with("</chargen>\n"));
        assert!(text.contains("<key name=\"KEY_A\" b0=\"97\"/>"));
        assert!(text.contains("<key name=\"KEY_ENTER\" ascii=\"13\"/>"));
    }

    #[test]
    fn test_generate_enter_linefeed() {
        let mut kb = FakeKeyboard::us_like();
        let mut settings = Settings::new();
        settings.set_enter_linefeed(true);
        let mut out = Vec::new();
        run(Command::Generate, &mut kb, &us(), &settings, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("<key name=\"KEY_ENTER\" ascii=\"10\"/>"));
        assert!(text.contains("<key name=\"KEY_KPENTER\" ascii=\"10\"/>"));
    }

    #[test]
    fn test_numlock_latched_for_run() {
        let mut kb = FakeKeyboard::us_like();
        run_to_string(Command::Generate, &mut kb);

        let numlock: Vec<_> = kb
            .transitions
            .iter()
            .filter(|(k, _)| *k == Key::NUMLOCK)
            .map(|(_, d)| *d)
            .collect();
        assert_eq!(
            numlock,
            vec![
                KeyDirection::Down,
                KeyDirection::Up,
                KeyDirection::Down,
                KeyDirection::Up
            ]
        );
        assert_eq!(kb.transitions.first(), Some(&(Key::NUMLOCK, KeyDirection::Down)));
        assert_eq!(kb.transitions.last(), Some(&(Key::NUMLOCK, KeyDirection::Up)));
        assert!(!kb.numlock());
    }

    #[test]
    fn test_dump_output() {
        let mut kb = FakeKeyboard::us_like();
        let text = run_to_string(Command::Dump, &mut kb);
        assert_eq!(
            text,
            "Dump of XKB keymap for us--en_US.UTF-8 by xkb2ifcfg\nxkb_keymap {\n};\n"
        );
    }

    #[test]
    fn test_info_output() {
        let mut kb = FakeKeyboard::us_like();
        let text = run_to_string(Command::Info, &mut kb);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Simple per-key info for us--en_US.UTF-8 by xkb2ifcfg");
        assert_eq!(lines.len(), 1 + PRINTABLE.len());
    }
}
