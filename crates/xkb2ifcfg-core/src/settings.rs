// xkb2ifcfg Settings Module
// Optional user settings for keymap compilation and chargen output

use std::path::{Path, PathBuf};

use crate::xml::DEFAULT_BUFFER_INCREMENT;

/// Environment variable naming an explicit settings file
pub const SETTINGS_ENV: &str = "XKB2IFCFG_SETTINGS";

/// Rules, model and options used to compile the keymap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XkbSettings {
    pub rules: String,
    pub model: String,
    /// XKB options, `None` when empty
    pub options: Option<String>,
}

impl Default for XkbSettings {
    fn default() -> Self {
        Self {
            rules: "evdev".to_string(),
            model: "pc105".to_string(),
            options: None,
        }
    }
}

/// Settings for xkb2ifcfg
///
/// These settings are loaded from a TOML file (default:
/// ~/.config/xkb2ifcfg/settings.toml). Every value is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    xkb: XkbSettings,

    /// Trailing `<!-- c -->` comment after character entries
    annotate: bool,

    /// Growth step of the output buffer in bytes
    buffer_increment: usize,

    /// Report ENTER as line feed instead of carriage return
    enter_linefeed: bool,

    /// Path to the settings file
    source_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsToml {
    #[serde(default)]
    xkb: Option<XkbToml>,

    #[serde(default)]
    output: Option<OutputToml>,

    #[serde(default)]
    compat: Option<CompatToml>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct XkbToml {
    #[serde(default)]
    rules: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    options: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct OutputToml {
    #[serde(default)]
    annotate: Option<bool>,
    #[serde(default)]
    buffer_increment: Option<i64>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CompatToml {
    #[serde(default)]
    enter_linefeed: Option<bool>,
}

impl Settings {
    /// Create settings with all defaults
    pub fn new() -> Self {
        Self {
            xkb: XkbSettings::default(),
            annotate: true,
            buffer_increment: DEFAULT_BUFFER_INCREMENT,
            enter_linefeed: false,
            source_path: None,
        }
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(xkb) = toml_settings.xkb {
            if let Some(rules) = xkb.rules {
                settings.xkb.rules = non_empty("xkb.rules", rules)?;
            }
            if let Some(model) = xkb.model {
                settings.xkb.model = non_empty("xkb.model", model)?;
            }
            settings.xkb.options = xkb.options.filter(|o| !o.trim().is_empty());
        }

        if let Some(output) = toml_settings.output {
            if let Some(annotate) = output.annotate {
                settings.annotate = annotate;
            }
            if let Some(increment) = output.buffer_increment {
                settings.buffer_increment = parse_increment(increment)?;
            }
        }

        if let Some(compat) = toml_settings.compat {
            if let Some(enter_linefeed) = compat.enter_linefeed {
                settings.enter_linefeed = enter_linefeed;
            }
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("xkb2ifcfg").join("settings.toml"))
    }

    /// Load from `$XKB2IFCFG_SETTINGS` if set, else from the default location.
    ///
    /// An explicitly named file must exist; a missing default file yields the
    /// default settings.
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = std::env::var_os(SETTINGS_ENV).filter(|p| !p.is_empty()) {
            log::debug!("loading settings from {}", Path::new(&path).display());
            return Self::from_file(path);
        }
        if let Some(path) = Self::default_path() {
            if path.exists() {
                log::debug!("loading settings from {}", path.display());
                return Self::from_file(path);
            }
        }
        Ok(Self::new())
    }

    pub fn xkb(&self) -> &XkbSettings {
        &self.xkb
    }

    pub fn annotate(&self) -> bool {
        self.annotate
    }

    pub fn buffer_increment(&self) -> usize {
        self.buffer_increment
    }

    pub fn enter_linefeed(&self) -> bool {
        self.enter_linefeed
    }

    pub fn set_annotate(&mut self, annotate: bool) {
        self.annotate = annotate;
    }

    pub fn set_enter_linefeed(&mut self, enter_linefeed: bool) {
        self.enter_linefeed = enter_linefeed;
    }

    /// File the settings were loaded from, if any
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}

fn non_empty(name: &str, value: String) -> Result<String, SettingsError> {
    if value.trim().is_empty() {
        return Err(SettingsError::InvalidValue(format!("{} must not be empty", name)));
    }
    Ok(value)
}

fn parse_increment(value: i64) -> Result<usize, SettingsError> {
    match usize::try_from(value) {
        Ok(increment) if increment > 0 => Ok(increment),
        _ => Err(SettingsError::InvalidValue(format!(
            "output.buffer_increment must be positive, got {}",
            value
        ))),
    }
}
