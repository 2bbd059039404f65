//! Recipe extraction module
//!
//! This module turns a fetched recipe page into a normalized [`Recipe`]
//! through three independent layers tried in order: Schema.org JSON-LD,
//! Schema.org microdata, and DOM heuristics.

pub mod dom;
pub mod duration;
pub mod heuristic;
pub mod jsonld;
pub mod microdata;
pub mod pipeline;
pub mod recipe;

pub use duration::normalize_duration;
pub use heuristic::{HeuristicConfig, HeuristicExtractor};
pub use jsonld::{JsonLdExtractor, LdBlock};
pub use microdata::MicrodataExtractor;
pub use pipeline::{PipelineOutput, RecipeExtractor, RecipePipeline};
pub use recipe::{ExtractedFields, ExtractionLayer, Recipe, UNTITLED_RECIPE};
