use anyhow::{Context, Result};

/// Backend-specific `Settings::options` keys understood by [`WindowBackend`].
///
/// Values are `"true"`/`"false"`. Unknown keys are ignored.
///
/// [`WindowBackend`]: super::WindowBackend
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WindowOption {
    Resizable,
    Decorations,
    Maximized,
    Vsync,
}

impl WindowOption {
    pub const ALL: [WindowOption; 4] = [
        WindowOption::Resizable,
        WindowOption::Decorations,
        WindowOption::Maximized,
        WindowOption::Vsync,
    ];

    pub fn key(self) -> &'static str {
        match self {
            WindowOption::Resizable => "resizable",
            WindowOption::Decorations => "decorations",
            WindowOption::Maximized => "maximized",
            WindowOption::Vsync => "vsync",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.key() == key)
    }

    /// Value used when the key is absent.
    pub fn default_value(self) -> bool {
        !matches!(self, WindowOption::Maximized)
    }

    /// Parses `value` as a flag for this option.
    pub fn parse(self, value: &str) -> Result<bool> {
        parse_flag(value).with_context(|| format!("invalid value {value:?} for window option {:?}", self.key()))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for opt in WindowOption::ALL {
            assert_eq!(WindowOption::from_key(opt.key()), Some(opt));
        }
        assert_eq!(WindowOption::from_key("opacity"), None);
    }

    #[test]
    fn flags_parse_loosely() {
        assert!(WindowOption::Vsync.parse(" True ").unwrap());
        assert!(!WindowOption::Resizable.parse("off").unwrap());
        let err = WindowOption::Maximized.parse("maybe").unwrap_err();
        assert!(err.to_string().contains("maximized"));
    }

    #[test]
    fn only_maximized_defaults_off() {
        assert!(WindowOption::Resizable.default_value());
        assert!(WindowOption::Vsync.default_value());
        assert!(!WindowOption::Maximized.default_value());
    }
}
