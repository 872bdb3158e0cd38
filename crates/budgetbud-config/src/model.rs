use std::{fmt, path::PathBuf};

use budgetbud_domain::Frequency;
use serde::{de::Deserializer, Deserialize, Serialize};

use crate::ConfigError;

/// Stores user-configurable preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    /// Display currency; amounts are never converted.
    pub currency: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub default_frequency: Frequency,
    #[serde(default = "Config::default_top_categories")]
    pub top_categories: usize,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root for stored books. Defaults to `<data dir>/books`.
    pub books_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            theme: Theme::default(),
            default_frequency: Frequency::default(),
            top_categories: Self::default_top_categories(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            last_user: None,
            books_root: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 6] = [
        "locale",
        "currency",
        "theme",
        "default_frequency",
        "top_categories",
        "ui_color_enabled",
    ];

    pub fn default_top_categories() -> usize {
        5
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Fallback application directory when no override is supplied.
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".budgetbud")
    }

    /// Resolves where books live, relative to the application data directory.
    pub fn resolve_books_root(&self, data_dir: &std::path::Path) -> PathBuf {
        self.books_root
            .clone()
            .unwrap_or_else(|| data_dir.join("books"))
    }

    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "locale" => self.locale = non_empty(key, value)?,
            "currency" => self.currency = non_empty(key, value)?.to_ascii_uppercase(),
            "theme" => self.theme = Theme::parse(value).ok_or_else(|| invalid(key, value))?,
            "default_frequency" => {
                self.default_frequency = value
                    .parse()
                    .map_err(|err: budgetbud_domain::ParseFrequencyError| {
                        invalid_with(key, err.to_string())
                    })?
            }
            "top_categories" => {
                self.top_categories = value
                    .parse::<usize>()
                    .ok()
                    .filter(|count| *count > 0)
                    .ok_or_else(|| invalid(key, value))?
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => return Err(invalid(key, value)),
                }
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Current value of every editable setting, in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("locale", self.locale.clone()),
            ("currency", self.currency.clone()),
            ("theme", self.theme.to_string()),
            ("default_frequency", self.default_frequency.as_str().to_string()),
            ("top_categories", self.top_categories.to_string()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
        ]
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        Err(invalid_with(key, "value must not be empty".into()))
    } else {
        Ok(value.to_string())
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    invalid_with(key, format!("`{value}` is not accepted"))
}

fn invalid_with(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "system" => Some(Theme::System),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or_default())
    }
}
