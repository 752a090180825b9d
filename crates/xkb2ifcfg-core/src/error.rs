// xkb2ifcfg Errors

use crate::settings::SettingsError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to compile keymap for layout '{layout}' variant '{variant}' locale '{locale}'")]
    KeymapCompile {
        layout: String,
        variant: String,
        locale: String,
    },

    #[error("failed to load compose table for locale '{locale}'")]
    ComposeTable { locale: String },

    #[error("settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_names_inputs() {
        let err = Error::KeymapCompile {
            layout: "de".to_string(),
            variant: "nodeadkeys".to_string(),
            locale: "de_DE.UTF-8".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'de'"));
        assert!(msg.contains("'nodeadkeys'"));
        assert!(msg.contains("'de_DE.UTF-8'"));
    }

    #[test]
    fn test_settings_error_converts() {
        let err: Error = SettingsError::InvalidValue("x".to_string()).into();
        assert!(matches!(err, Error::Settings(_)));
        assert_eq!(err.to_string(), "settings: Invalid setting value: x");
    }
}
