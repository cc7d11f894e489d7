//! Locale context passed to every Storefront API query.
//!
//! Queries are localized through the `@inContext(country:, language:)`
//! directive, so both codes travel as GraphQL variables.

use std::fmt;

/// A string that is not a two-letter code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCode(pub String);

impl fmt::Display for InvalidCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid code '{}': expected two ASCII letters", self.0)
    }
}

impl std::error::Error for InvalidCode {}

/// ISO 3166-1 alpha-2 country code, stored upper-case (`US`, `CA`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct CountryCode(String);

/// ISO 639-1 language code, stored upper-case (`EN`, `FR`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct LanguageCode(String);

macro_rules! impl_code {
    ($name:ident) => {
        impl $name {
            /// Parse a two-letter code, case-insensitively.
            ///
            /// Returns `None` unless the input is exactly two ASCII letters.
            pub fn parse(code: &str) -> Option<Self> {
                if code.len() == 2 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
                    Some(Self(code.to_ascii_uppercase()))
                } else {
                    None
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidCode;

            fn try_from(code: String) -> Result<Self, Self::Error> {
                Self::parse(&code).ok_or(InvalidCode(code))
            }
        }

        impl From<$name> for String {
            fn from(code: $name) -> Self {
                code.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

impl_code!(CountryCode);
impl_code!(LanguageCode);

/// The country/language pair a request is served in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Locale {
    pub country: CountryCode,
    pub language: LanguageCode,
}

impl Locale {
    pub fn new(country: CountryCode, language: LanguageCode) -> Self {
        Self { country, language }
    }

    /// Build a locale from raw codes, e.g. `Locale::parse("CA", "fr")`.
    pub fn parse(country: &str, language: &str) -> Option<Self> {
        Some(Self {
            country: CountryCode::parse(country)?,
            language: LanguageCode::parse(language)?,
        })
    }

    /// Parse a `{language}-{country}` URL segment such as `en-ca`.
    ///
    /// The segment may carry a leading slash. Anything that is not two
    /// two-letter codes joined by a dash yields `None`.
    pub fn from_path_prefix(segment: &str) -> Option<Self> {
        let segment = segment.strip_prefix('/').unwrap_or(segment);
        let (language, country) = segment.split_once('-')?;
        Self::parse(country, language)
    }

    /// The URL prefix for this locale, lower-case (`/en-us`).
    pub fn path_prefix(&self) -> String {
        format!(
            "/{}-{}",
            self.language.as_str().to_ascii_lowercase(),
            self.country.as_str().to_ascii_lowercase()
        )
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            country: CountryCode("US".to_string()),
            language: LanguageCode("EN".to_string()),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.language, self.country)
    }
}
