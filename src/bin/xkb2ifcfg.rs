// xkb2ifcfg CLI
// Generates input filter chargen configurations from XKB layouts

use std::ffi::OsString;
use std::io::{self, BufWriter};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use xkb2ifcfg_core::{Command, LayoutSpec, Settings, XkbKeyboard};

const USAGE: &str = "usage: xkb2ifcfg <command> <layout> <variant> <locale>

  Commands

    generate   generate input_filter config
    dump       dump raw XKB keymap
    info       simple per-key information

  Example

    xkb2ifcfg generate us ''         en_US.UTF-8
    xkb2ifcfg info     de nodeadkeys de_DE.UTF-8
";

/// Generate input filter chargen configurations from XKB layouts
#[derive(Parser, Debug)]
#[command(name = "xkb2ifcfg")]
#[command(about = "Generate input filter chargen configurations from XKB layouts", long_about = None)]
#[command(disable_help_subcommand = true, disable_help_flag = true, disable_version_flag = true)]
struct Args {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum CliCommand {
    /// generate input_filter config
    #[command(disable_help_flag = true)]
    Generate(LayoutArgs),
    /// dump raw XKB keymap
    #[command(disable_help_flag = true)]
    Dump(LayoutArgs),
    /// simple per-key information
    #[command(disable_help_flag = true)]
    Info(LayoutArgs),
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
struct LayoutArgs {
    /// XKB layout, e.g. "us"
    #[arg(allow_hyphen_values = true)]
    layout: String,
    /// XKB layout variant, may be empty
    #[arg(allow_hyphen_values = true)]
    variant: String,
    /// Locale selecting the compose table, e.g. "en_US.UTF-8"
    #[arg(allow_hyphen_values = true)]
    locale: String,
}

impl CliCommand {
    fn split(self) -> (Command, LayoutSpec) {
        let (command, args) = match self {
            CliCommand::Generate(args) => (Command::Generate, args),
            CliCommand::Dump(args) => (Command::Dump, args),
            CliCommand::Info(args) => (Command::Info, args),
        };
        (
            command,
            LayoutSpec::new(args.layout, args.variant, args.locale),
        )
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let (command, spec) = args.command.split();

    let settings = Settings::load_default().context("failed to load settings")?;
    if let Some(path) = settings.source_path() {
        log::info!("using settings from {}", path.display());
    }

    let mut keyboard = XkbKeyboard::compile(&spec, settings.xkb())
        .with_context(|| format!("failed to compile layout {}", spec))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    xkb2ifcfg_core::run(command, &mut keyboard, &spec, &settings, &mut out)
        .with_context(|| format!("{} failed for {}", command, spec))?;

    Ok(())
}

/// Parse the command line. Anything but `<command> <layout> <variant> <locale>`
/// prints the usage to stderr and fails.
fn parse_args<I, T>(argv: I) -> Result<Args, ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(argv).map_err(|_| {
        eprint!("{}", USAGE);
        ExitCode::FAILURE
    })
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
