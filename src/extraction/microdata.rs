//! Layer 2: Schema.org microdata extraction
//!
//! Reads `itemprop` attributes under the first element whose `itemtype`
//! names the Recipe vocabulary.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::extraction::dom::{non_empty_attr, non_empty_text};
use crate::extraction::duration::normalize_duration;
use crate::extraction::pipeline::RecipeExtractor;
use crate::extraction::recipe::{ExtractedFields, ExtractionLayer};

static RECIPE_SCOPE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[itemtype*="schema.org/Recipe"]"#).expect("itemtype selector is valid")
});

/// Ingredient property names, canonical first. Only the first that yields
/// anything is used.
const INGREDIENT_PROPS: [&str; 2] = ["recipeIngredient", "ingredients"];

/// A property lookup scoped to one recipe element
struct Scope<'a> {
    root: ElementRef<'a>,
}

impl<'a> Scope<'a> {
    fn all(&self, prop: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.root
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(move |el| {
                el.value()
                    .attr("itemprop")
                    .is_some_and(|v| v.split_whitespace().any(|token| token == prop))
            })
    }

    fn first(&self, prop: &'a str) -> Option<ElementRef<'a>> {
        self.all(prop).next()
    }

    /// `content` attribute, else visible text.
    fn scalar(&self, prop: &'a str) -> Option<String> {
        self.first(prop).and_then(content_or_text)
    }

    fn image(&self) -> Option<String> {
        self.first("image")
            .and_then(|el| non_empty_attr(el, "src").or_else(|| non_empty_attr(el, "content")))
    }

    fn duration(&self, prop: &'a str) -> Option<String> {
        self.first(prop)
            .and_then(|el| {
                non_empty_attr(el, "datetime")
                    .or_else(|| non_empty_attr(el, "content"))
                    .or_else(|| non_empty_text(el))
            })
            .map(|raw| normalize_duration(&raw))
    }

    fn texts(&self, prop: &'a str) -> Vec<String> {
        self.all(prop).filter_map(content_or_text).collect()
    }
}

fn content_or_text(el: ElementRef<'_>) -> Option<String> {
    match el.value().attr("content") {
        Some(content) => Some(content.trim().to_string()).filter(|c| !c.is_empty()),
        None => non_empty_text(el),
    }
}

/// Schema.org microdata extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrodataExtractor;

impl MicrodataExtractor {
    /// Create the extractor
    pub fn new() -> Self {
        Self
    }
}

impl RecipeExtractor for MicrodataExtractor {
    fn layer(&self) -> ExtractionLayer {
        ExtractionLayer::Microdata
    }

    fn attempt(&self, doc: &Html) -> Option<ExtractedFields> {
        let root = doc.select(&RECIPE_SCOPE_SELECTOR).next()?;
        let scope = Scope { root };

        let ingredients = INGREDIENT_PROPS
            .iter()
            .map(|prop| scope.texts(prop))
            .find(|found| !found.is_empty())
            .unwrap_or_default();

        let fields = ExtractedFields {
            title: scope.scalar("name"),
            image: scope.image(),
            description: scope.scalar("description"),
            prep_time: scope.duration("prepTime"),
            cook_time: scope.duration("cookTime"),
            total_time: scope.duration("totalTime"),
            servings: scope.scalar("recipeYield"),
            ingredients,
            instructions: scope.texts("recipeInstructions"),
        };

        if fields.is_empty_match() {
            return None;
        }
        Some(fields)
    }
}
