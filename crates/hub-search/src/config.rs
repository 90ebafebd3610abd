//! Search mode selection.
//!
//! The mode picks which [`SearchStrategy`](hub_core::SearchStrategy) the
//! engine delegates to. It is read once at startup from `SEARCH_MODE`.

use std::env;
use std::fmt;

use hub_core::{Error, Result};

/// Environment variable holding the search mode.
pub const SEARCH_MODE_ENV: &str = "SEARCH_MODE";

/// Which execution strategy backs advanced search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Postgres full-text search over the English tsvector.
    #[default]
    FullText,
    /// Case-insensitive substring match, for stores without FTS.
    Substring,
}

impl SearchMode {
    /// Parse a mode name. Case-insensitive; surrounding whitespace ignored.
    ///
    /// Accepts `fulltext` (`fts`, `full_text`) and `substring` (`ilike`).
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "fulltext" | "fts" | "full_text" => Ok(SearchMode::FullText),
            "substring" | "ilike" => Ok(SearchMode::Substring),
            other => Err(Error::Config(format!(
                "Unknown {}: '{}'. Must be one of: fulltext, substring",
                SEARCH_MODE_ENV, other
            ))),
        }
    }

    /// Read `SEARCH_MODE`, defaulting to full-text when unset or empty.
    pub fn from_env() -> Result<Self> {
        match env::var(SEARCH_MODE_ENV) {
            Ok(val) if !val.trim().is_empty() => Self::parse(&val),
            _ => Ok(SearchMode::default()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::FullText => "fulltext",
            SearchMode::Substring => "substring",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fulltext() {
        assert_eq!(SearchMode::default(), SearchMode::FullText);
    }

    #[test]
    fn test_parse_canonical_names() {
        assert_eq!(SearchMode::parse("fulltext").unwrap(), SearchMode::FullText);
        assert_eq!(SearchMode::parse("substring").unwrap(), SearchMode::Substring);
    }

    #[test]
    fn test_parse_aliases_and_case() {
        assert_eq!(SearchMode::parse("FTS").unwrap(), SearchMode::FullText);
        assert_eq!(SearchMode::parse(" Full_Text ").unwrap(), SearchMode::FullText);
        assert_eq!(SearchMode::parse("ILIKE").unwrap(), SearchMode::Substring);
    }

    #[test]
    fn test_parse_unknown_is_config_error() {
        let err = SearchMode::parse("vector").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("vector"));
    }

    #[test]
    fn test_as_str_round_trips() {
        for mode in [SearchMode::FullText, SearchMode::Substring] {
            assert_eq!(SearchMode::parse(mode.as_str()).unwrap(), mode);
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }
}
