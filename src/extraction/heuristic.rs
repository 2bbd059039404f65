//! Layer 3: HTML heuristics
//!
//! Used when a page carries neither JSON-LD nor microdata. Metadata comes
//! from headings and Open Graph / Twitter meta tags; ingredient and
//! instruction lists come from known recipe-plugin class names, or failing
//! that, from the first list that follows a matching heading.

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractionError;
use crate::extraction::dom::{
    collect_texts, compile_selector, first_match, following_elements, is_list, list_item_texts,
    non_empty_attr, non_empty_text,
};
use crate::extraction::pipeline::RecipeExtractor;
use crate::extraction::recipe::{ExtractedFields, ExtractionLayer};

/// Tunables for the heuristic extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicConfig {
    /// Plugin selectors whose matches are ingredient lines
    pub ingredient_selectors: Vec<String>,
    /// Plugin selectors whose matches are instruction steps
    pub instruction_selectors: Vec<String>,
    /// Lowercase keywords marking an ingredients heading
    pub ingredient_keywords: Vec<String>,
    /// Lowercase keywords marking an instructions heading
    pub instruction_keywords: Vec<String>,
    /// How many following siblings of a heading to search for a list
    pub sibling_window: usize,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            // WP Recipe Maker, Tasty Recipes, and generic theme markup
            ingredient_selectors: owned(&[
                ".wprm-recipe-ingredient",
                ".tasty-recipes-ingredients li",
                ".recipe-ingredients li",
                ".ingredient-item",
            ]),
            instruction_selectors: owned(&[
                ".wprm-recipe-instruction-text",
                ".tasty-recipes-instructions-body li",
                ".recipe-instructions li",
                ".direction-item",
            ]),
            ingredient_keywords: owned(&["ingredient"]),
            instruction_keywords: owned(&[
                "instruction",
                "direction",
                "method",
                "step",
                "preparation",
            ]),
            sibling_window: 4,
        }
    }
}

/// Selectors compiled once from a [`HeuristicConfig`]
#[derive(Debug)]
struct CompiledSelectors {
    h1: Selector,
    title: Selector,
    headings: Selector,
    nested_list: Selector,
    og_title: Selector,
    og_image: Selector,
    og_description: Selector,
    twitter_image: Selector,
    meta_description: Selector,
    ingredients: Selector,
    instructions: Selector,
}

impl CompiledSelectors {
    fn compile(config: &HeuristicConfig) -> Result<Self, ExtractionError> {
        Ok(Self {
            h1: compile_selector("h1")?,
            title: compile_selector("title")?,
            headings: compile_selector("h1, h2, h3, h4, h5")?,
            nested_list: compile_selector("ul, ol")?,
            og_title: compile_selector(r#"meta[property="og:title"]"#)?,
            og_image: compile_selector(r#"meta[property="og:image"]"#)?,
            og_description: compile_selector(r#"meta[property="og:description"]"#)?,
            twitter_image: compile_selector(r#"meta[name="twitter:image"]"#)?,
            meta_description: compile_selector(r#"meta[name="description"]"#)?,
            ingredients: compile_selector(&config.ingredient_selectors.join(", "))?,
            instructions: compile_selector(&config.instruction_selectors.join(", "))?,
        })
    }
}

/// DOM heuristic extractor
#[derive(Debug)]
pub struct HeuristicExtractor {
    config: HeuristicConfig,
    selectors: CompiledSelectors,
}

impl HeuristicExtractor {
    /// Build an extractor with the default plugin catalogue and keywords.
    pub fn new() -> Result<Self, ExtractionError> {
        Self::with_config(HeuristicConfig::default())
    }

    /// Build an extractor from a custom configuration.
    ///
    /// Fails if any configured selector is not valid CSS, or a selector list
    /// is empty.
    pub fn with_config(config: HeuristicConfig) -> Result<Self, ExtractionError> {
        let selectors = CompiledSelectors::compile(&config)?;
        Ok(Self { config, selectors })
    }

    /// The active configuration.
    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    fn meta_content(doc: &Html, selector: &Selector) -> Option<String> {
        first_match(doc, selector).and_then(|el| non_empty_attr(el, "content"))
    }

    fn title(&self, doc: &Html) -> Option<String> {
        first_match(doc, &self.selectors.h1)
            .and_then(non_empty_text)
            .or_else(|| Self::meta_content(doc, &self.selectors.og_title))
            .or_else(|| first_match(doc, &self.selectors.title).and_then(non_empty_text))
    }

    fn image(&self, doc: &Html) -> Option<String> {
        Self::meta_content(doc, &self.selectors.og_image)
            .or_else(|| Self::meta_content(doc, &self.selectors.twitter_image))
    }

    fn description(&self, doc: &Html) -> Option<String> {
        Self::meta_content(doc, &self.selectors.og_description)
            .or_else(|| Self::meta_content(doc, &self.selectors.meta_description))
    }

    /// Items of the first list following a heading that mentions a keyword.
    ///
    /// Headings are visited in document order. For each matching heading at
    /// most `sibling_window` following elements are inspected; the first one
    /// that is a list, or wraps a list, supplies the items. Scanning stops at
    /// the first heading that yields anything.
    pub fn list_after_heading(&self, doc: &Html, keywords: &[String]) -> Vec<String> {
        for heading in doc.select(&self.selectors.headings) {
            let text = heading.text().collect::<String>().to_lowercase();
            if !keywords.iter().any(|kw| text.contains(kw.as_str())) {
                continue;
            }

            if let Some(list) = self.list_near(heading) {
                let items = list_item_texts(list);
                if !items.is_empty() {
                    return items;
                }
            }
        }
        Vec::new()
    }

    fn list_near<'a>(&self, heading: ElementRef<'a>) -> Option<ElementRef<'a>> {
        for sibling in following_elements(heading).take(self.config.sibling_window) {
            if is_list(sibling) {
                return Some(sibling);
            }
            if let Some(nested) = sibling.select(&self.selectors.nested_list).next() {
                return Some(nested);
            }
        }
        None
    }

    fn section(&self, doc: &Html, plugin: &Selector, keywords: &[String]) -> Vec<String> {
        let from_plugin = collect_texts(doc, plugin);
        if !from_plugin.is_empty() {
            return from_plugin;
        }
        self.list_after_heading(doc, keywords)
    }
}

impl RecipeExtractor for HeuristicExtractor {
    fn layer(&self) -> ExtractionLayer {
        ExtractionLayer::Heuristic
    }

    fn attempt(&self, doc: &Html) -> Option<ExtractedFields> {
        let fields = ExtractedFields {
            title: self.title(doc),
            image: self.image(doc),
            description: self.description(doc),
            ingredients: self.section(
                doc,
                &self.selectors.ingredients,
                &self.config.ingredient_keywords,
            ),
            instructions: self.section(
                doc,
                &self.selectors.instructions,
                &self.config.instruction_keywords,
            ),
            ..Default::default()
        };

        if fields.is_empty_match() {
            return None;
        }
        Some(fields)
    }
}
