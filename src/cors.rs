//! CORS (Cross-Origin Resource Sharing) configuration for the recipe API
//!
//! The API is called from a browser front end, so only the configured
//! origins are allowed. Origins are matched exactly (scheme, host and port).
//!
//! - **Allowed Methods**: GET, POST, OPTIONS (preflight)
//! - **Allowed Headers**: Content-Type
//! - **Max Age**: 3600 seconds (1 hour) for preflight caching

use http::{header::HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// Allowed request headers
pub const ALLOWED_HEADERS: [http::header::HeaderName; 1] = [http::header::CONTENT_TYPE];

/// Allowed methods
pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Default max age for preflight cache (1 hour)
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;

/// Converts configured origins into header values, dropping any that are
/// not valid header text or lack an http(s) scheme.
pub fn origin_header_values(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| {
            let trimmed = origin.trim().trim_end_matches('/');
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                warn!("Ignoring CORS origin without http(s) scheme: {}", origin);
                return None;
            }
            match HeaderValue::from_str(trimmed) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            }
        })
        .collect()
}

/// Creates a CORS layer that allows exactly the given origins.
///
/// # Example
///
/// ```rust
/// use recipekit_web::cors::cors_layer;
///
/// let layer = cors_layer(&["http://localhost:5173".to_string()]);
/// ```
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origin_header_values(origins)))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
        .max_age(Duration::from_secs(DEFAULT_MAX_AGE_SECS))
}
