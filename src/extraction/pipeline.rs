//! Extraction pipeline orchestrator
//!
//! Runs the extraction layers in precedence order and builds a [`Recipe`]
//! from the first layer that returns anything. Later layers never run once
//! an earlier one has succeeded, and results are never merged.

use scraper::Html;
use tracing::{debug, info, instrument};

use crate::error::{ExtractionError, Result};
use crate::extraction::dom::parse_document;
use crate::extraction::heuristic::{HeuristicConfig, HeuristicExtractor};
use crate::extraction::jsonld::JsonLdExtractor;
use crate::extraction::microdata::MicrodataExtractor;
use crate::extraction::recipe::{ExtractedFields, ExtractionLayer, Recipe};

/// A single extraction layer.
///
/// Implementations are pure functions of the document: `None` means "no
/// usable data here", which sends the pipeline on to the next layer.
pub trait RecipeExtractor: Send + Sync {
    /// Which layer this is
    fn layer(&self) -> ExtractionLayer;

    /// Try to extract recipe fields from the document
    fn attempt(&self, doc: &Html) -> Option<ExtractedFields>;
}

/// A recipe plus the layer that produced it
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The assembled record
    pub recipe: Recipe,
    /// The winning layer
    pub layer: ExtractionLayer,
}

/// Ordered chain of extraction layers
pub struct RecipePipeline {
    extractors: Vec<Box<dyn RecipeExtractor>>,
}

impl RecipePipeline {
    /// The standard chain: JSON-LD, then microdata, then heuristics.
    pub fn new() -> Result<Self> {
        Self::with_heuristics(HeuristicConfig::default())
    }

    /// The standard chain with a custom heuristic configuration.
    pub fn with_heuristics(config: HeuristicConfig) -> Result<Self> {
        let heuristic = HeuristicExtractor::with_config(config)?;
        Ok(Self::from_extractors(vec![
            Box::new(JsonLdExtractor::new()),
            Box::new(MicrodataExtractor::new()),
            Box::new(heuristic),
        ]))
    }

    /// Build a pipeline from an explicit, ordered list of layers.
    pub fn from_extractors(extractors: Vec<Box<dyn RecipeExtractor>>) -> Self {
        Self { extractors }
    }

    /// Layers in the order they are tried.
    pub fn layers(&self) -> Vec<ExtractionLayer> {
        self.extractors.iter().map(|e| e.layer()).collect()
    }

    /// Run the layers against an already-parsed document and return the
    /// first non-empty result.
    pub fn first_match(&self, doc: &Html) -> Option<(ExtractionLayer, ExtractedFields)> {
        self.extractors
            .iter()
            .find_map(|extractor| extractor.attempt(doc).map(|f| (extractor.layer(), f)))
    }

    /// Extract a recipe from HTML, reporting which layer produced it.
    #[instrument(skip(self, html), fields(html_len = html.len()))]
    pub fn run(&self, html: &str, url: &str) -> Result<PipelineOutput> {
        let doc = parse_document(html);

        let Some((layer, fields)) = self.first_match(&doc) else {
            info!("No extraction layer found recipe data");
            return Err(ExtractionError::NoRecipeData.into());
        };

        let recipe = Recipe::assemble(fields, url);
        debug!(
            "Extracted via {}: {} ingredients, {} instructions, partial={}",
            layer,
            recipe.ingredients.len(),
            recipe.instructions.len(),
            recipe.partial
        );

        Ok(PipelineOutput { recipe, layer })
    }

    /// Extract a recipe from HTML.
    pub fn extract(&self, html: &str, url: &str) -> Result<Recipe> {
        self.run(html, url).map(|out| out.recipe)
    }
}

impl std::fmt::Debug for RecipePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipePipeline")
            .field("layers", &self.layers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        layer: ExtractionLayer,
        result: Option<ExtractedFields>,
        calls: Arc<AtomicUsize>,
    }

    impl RecipeExtractor for Fixed {
        fn layer(&self) -> ExtractionLayer {
            self.layer
        }

        fn attempt(&self, _doc: &Html) -> Option<ExtractedFields> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn titled(title: &str) -> ExtractedFields {
        ExtractedFields {
            title: Some(title.to_string()),
            ingredients: vec!["x".to_string()],
            instructions: vec!["y".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_layer_order() {
        let pipeline = RecipePipeline::new().unwrap();
        assert_eq!(pipeline.layers(), ExtractionLayer::ALL.to_vec());
    }

    #[test]
    fn test_short_circuits_on_first_result() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let pipeline = RecipePipeline::from_extractors(vec![
            Box::new(Fixed {
                layer: ExtractionLayer::JsonLd,
                result: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Box::new(Fixed {
                layer: ExtractionLayer::Microdata,
                result: Some(titled("Second")),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Box::new(Fixed {
                layer: ExtractionLayer::Heuristic,
                result: Some(titled("Third")),
                calls: later_calls.clone(),
            }),
        ]);

        let out = pipeline.run("<html></html>", "https://example.com").unwrap();
        assert_eq!(out.layer, ExtractionLayer::Microdata);
        assert_eq!(out.recipe.title, "Second");
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_winning_layer_fields_are_not_merged() {
        let sparse = ExtractedFields {
            ingredients: vec!["only ingredient".to_string()],
            ..Default::default()
        };
        let pipeline = RecipePipeline::from_extractors(vec![
            Box::new(Fixed {
                layer: ExtractionLayer::JsonLd,
                result: Some(sparse),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Box::new(Fixed {
                layer: ExtractionLayer::Heuristic,
                result: Some(titled("Complete")),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        ]);

        let recipe = pipeline.extract("", "https://example.com").unwrap();
        assert_eq!(recipe.title, "Untitled Recipe");
        assert!(recipe.instructions.is_empty());
        assert!(recipe.partial);
    }

    #[test]
    fn test_all_layers_empty_is_no_recipe_data() {
        let pipeline = RecipePipeline::from_extractors(Vec::new());
        let err = pipeline.extract("<p>hi</p>", "https://example.com").unwrap_err();
        assert!(matches!(
            err,
            Error::Extraction(ExtractionError::NoRecipeData)
        ));
    }
}
