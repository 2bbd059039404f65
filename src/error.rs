//! Error types for RecipeKit Web
//!
//! This module provides the error hierarchy using `thiserror`. The extraction
//! pipeline raises exactly one failure kind ([`ExtractionError::NoRecipeData`]);
//! fetch failures are classified separately so the route layer can map each
//! one to its own user-facing message.

use thiserror::Error;

/// Fixed guidance message returned when no layer finds recipe data.
pub const NO_RECIPE_DATA_MESSAGE: &str =
    "no recipe data found; ensure the URL points directly to a recipe";

/// The main error type for RecipeKit Web operations
#[derive(Error, Debug)]
pub enum Error {
    /// Recipe extraction errors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Errors retrieving the page HTML
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The supplied URL is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Recipe extraction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// All extraction layers came back empty
    #[error("{}", NO_RECIPE_DATA_MESSAGE)]
    NoRecipeData,

    /// A configured CSS selector failed to parse
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Network-classified failures from the page fetcher
#[derive(Error, Debug)]
pub enum FetchError {
    /// The site answered 403
    #[error("Request forbidden (HTTP 403)")]
    Forbidden,

    /// The site answered 429
    #[error("Rate limited (HTTP 429)")]
    RateLimited,

    /// Any other HTTP error status
    #[error("HTTP error {0}")]
    HttpStatus(u16),

    /// The request did not complete in time
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Transport-level failure (DNS, TLS, connection reset, body decode)
    #[error("Network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Message suitable for showing to the person who submitted the URL.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Forbidden => "This site is blocking our request. Try copying the recipe URL from a different site, or paste the recipe text directly.".to_string(),
            FetchError::RateLimited => {
                "This site is rate-limiting requests. Try again in a minute.".to_string()
            }
            FetchError::HttpStatus(status) => format!(
                "The site returned an error ({}). The URL may be invalid or the page may require a login.",
                status
            ),
            FetchError::Timeout(_) => "The site took too long to respond. Try again.".to_string(),
            FetchError::Network(msg) => msg.clone(),
        }
    }

    /// Classify an HTTP status code, returning `None` for non-error statuses.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            403 => Some(FetchError::Forbidden),
            429 => Some(FetchError::RateLimited),
            s if s >= 400 => Some(FetchError::HttpStatus(s)),
            _ => None,
        }
    }
}

/// Configuration loading errors, raised by
/// [`ServerConfig::from_env`](crate::config::ServerConfig::from_env)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue {
        /// Variable name
        name: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type alias for RecipeKit Web operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Message suitable for an API response body.
    ///
    /// Fetch failures use their classified message; extraction failures use
    /// the fixed guidance text.
    pub fn user_message(&self) -> String {
        match self {
            Error::Fetch(e) => e.user_message(),
            Error::Extraction(e) => e.to_string(),
            Error::InvalidUrl(_) => "Invalid URL".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_recipe_data_message() {
        let err = ExtractionError::NoRecipeData;
        assert_eq!(err.to_string(), NO_RECIPE_DATA_MESSAGE);
        assert!(err.to_string().starts_with("no recipe data found"));
    }

    #[test]
    fn test_error_display_wraps_extraction() {
        let err = Error::from(ExtractionError::InvalidSelector("..bad".to_string()));
        assert!(err.to_string().contains("Invalid selector"));
        assert!(err.to_string().contains("..bad"));
    }

    #[test]
    fn test_fetch_error_from_status() {
        assert!(matches!(FetchError::from_status(403), Some(FetchError::Forbidden)));
        assert!(matches!(FetchError::from_status(429), Some(FetchError::RateLimited)));
        assert!(matches!(FetchError::from_status(404), Some(FetchError::HttpStatus(404))));
        assert!(matches!(FetchError::from_status(503), Some(FetchError::HttpStatus(503))));
        assert!(FetchError::from_status(200).is_none());
        assert!(FetchError::from_status(304).is_none());
    }

    #[test]
    fn test_fetch_user_messages() {
        assert!(FetchError::Forbidden.user_message().contains("blocking"));
        assert!(FetchError::RateLimited.user_message().contains("rate-limiting"));
        assert!(FetchError::HttpStatus(404).user_message().contains("(404)"));
        assert!(FetchError::Timeout(10_000).user_message().contains("too long"));
    }

    #[test]
    fn test_user_message_for_extraction() {
        let err = Error::from(ExtractionError::NoRecipeData);
        assert_eq!(err.user_message(), NO_RECIPE_DATA_MESSAGE);
    }

    #[test]
    fn test_invalid_url_user_message_hides_detail() {
        let err = Error::InvalidUrl("ftp://x: unsupported scheme".to_string());
        assert_eq!(err.user_message(), "Invalid URL");
        assert!(err.to_string().contains("ftp://x"));
    }

    #[test]
    fn test_config_error_names_variable() {
        let err = ConfigError::InvalidValue {
            name: "RECIPEKIT_PORT".to_string(),
            reason: "invalid digit".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for RECIPEKIT_PORT: invalid digit"
        );
    }
}
