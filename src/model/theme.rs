use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::task::{ParseError, normalize_word};

/// Process-wide theme selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
    Ocean,
    Sunset,
}

impl ThemeName {
    pub const ALL: [ThemeName; 4] = [
        ThemeName::Light,
        ThemeName::Dark,
        ThemeName::Ocean,
        ThemeName::Sunset,
    ];

    /// Name as persisted under the `theme` key
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeName::Light => "light",
            ThemeName::Dark => "dark",
            ThemeName::Ocean => "ocean",
            ThemeName::Sunset => "sunset",
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_word(s);
        ThemeName::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| ParseError::Theme(s.to_string()))
    }
}
