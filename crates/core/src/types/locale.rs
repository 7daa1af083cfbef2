//! Supported interface languages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a language code is not one the storefront ships.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported locale: {0}")]
pub struct LocaleError(pub String);

/// An interface language, identified in URLs by its ISO 639-1 code.
///
/// Every page lives under a locale segment (`/ar/menu`, `/en/cart`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Locale {
    /// Arabic (`ar`), the default storefront language.
    #[default]
    #[serde(rename = "ar")]
    Arabic,
    /// English (`en`).
    #[serde(rename = "en")]
    English,
}

/// Text direction for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rtl,
    Ltr,
}

impl Locale {
    /// Every locale the storefront knows how to render.
    pub const ALL: [Self; 2] = [Self::Arabic, Self::English];

    /// The URL segment and `Accept-Language` tag for this locale.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Arabic => "ar",
            Self::English => "en",
        }
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        match self {
            Self::Arabic => Direction::Rtl,
            Self::English => Direction::Ltr,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    /// Parses a bare language code, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| LocaleError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("ar".parse::<Locale>().unwrap(), Locale::Arabic);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::English);
        assert!("fr".parse::<Locale>().is_err());
        assert!("en-US".parse::<Locale>().is_err());
    }

    #[test]
    fn test_default_is_arabic() {
        assert_eq!(Locale::default(), Locale::Arabic);
    }

    #[test]
    fn test_direction() {
        assert_eq!(Locale::Arabic.direction(), Direction::Rtl);
        assert_eq!(Locale::English.direction(), Direction::Ltr);
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Locale::English).unwrap(), "\"en\"");
        let parsed: Locale = serde_json::from_str("\"ar\"").unwrap();
        assert_eq!(parsed, Locale::Arabic);
    }
}
