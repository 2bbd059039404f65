//! RecipeKit Web - Recipe Extraction from Arbitrary Web Pages
//!
//! This crate turns an uncontrolled recipe page into a normalized record
//! (title, image, timings, servings, ingredients, instructions), despite the
//! wildly inconsistent markup publishers use.
//!
//! # Architecture
//!
//! ```text
//! HTTP API / CLI ──▶ RecipeService ──▶ HtmlFetcher (reqwest)
//!                          │
//!                          ▼
//!                   RecipePipeline
//!        ┌─────────────────┼──────────────────┐
//!        ▼                 ▼                  ▼
//!   JSON-LD (1) ──none──▶ Microdata (2) ──none──▶ Heuristics (3)
//!        │                 │                  │
//!        └──── first non-empty result ────────┘
//!                          ▼
//!                        Recipe
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use recipekit_web::extraction::RecipePipeline;
//!
//! let html = r#"<script type="application/ld+json">
//!   {"@type": "Recipe", "name": "Toast",
//!    "recipeIngredient": ["bread"], "recipeInstructions": ["Toast it."]}
//! </script>"#;
//!
//! let pipeline = RecipePipeline::new().unwrap();
//! let recipe = pipeline.extract(html, "https://example.com/toast").unwrap();
//! assert_eq!(recipe.title, "Toast");
//! assert!(!recipe.partial);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod cors;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod handlers;
pub mod service;

// Re-exports for convenience
pub use config::ServerConfig;
pub use error::{Error, Result};
pub use extraction::{ExtractionLayer, Recipe, RecipePipeline};
pub use fetch::{FetchConfig, HtmlFetcher, HttpFetcher};
pub use service::RecipeService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
