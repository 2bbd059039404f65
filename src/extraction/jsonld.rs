//! Layer 1: Schema.org JSON-LD extraction
//!
//! Scans `<script type="application/ld+json">` blocks in document order and
//! maps the first `Recipe`-typed node onto [`ExtractedFields`]. Malformed
//! blocks are skipped; they never abort the scan.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::extraction::duration::normalize_duration;
use crate::extraction::pipeline::RecipeExtractor;
use crate::extraction::recipe::{ExtractedFields, ExtractionLayer};

static LD_JSON_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("ld+json selector is valid")
});

const RECIPE_TYPE: &str = "Recipe";
const SECTION_TYPE: &str = "HowToSection";

/// Outcome of reading one script block
#[derive(Debug)]
pub enum LdBlock {
    /// The block parsed; these are its flattened candidate nodes
    Parsed(Vec<Value>),
    /// The block was not valid JSON
    Malformed,
}

impl LdBlock {
    /// Parse the raw text of one script block.
    pub fn parse(raw: &str) -> Self {
        let raw = raw
            .trim()
            .trim_start_matches("<![CDATA[")
            .trim_end_matches("]]>")
            .trim();

        match serde_json::from_str::<Value>(raw) {
            Ok(value) => LdBlock::Parsed(candidates(value)),
            Err(_) => LdBlock::Malformed,
        }
    }
}

/// Flatten a parsed block into candidate nodes: a top-level array, the
/// `@graph` of an object, or the object itself.
fn candidates(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("@graph") {
            Some(Value::Array(nodes)) => nodes,
            Some(node @ Value::Object(_)) => vec![node],
            Some(Value::Null) | None => vec![Value::Object(obj)],
            Some(_) => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn has_type(node: &Value, wanted: &str) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => t == wanted,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(wanted)),
        _ => false,
    }
}

/// Render a scalar JSON value as a trimmed, non-empty string.
fn scalar(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    Some(text).filter(|t| !t.is_empty())
}

fn field(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(scalar)
}

fn image_url(raw: &Value) -> Option<String> {
    match raw {
        Value::String(_) => scalar(raw),
        Value::Array(items) => items.first().and_then(|first| match first {
            Value::Object(_) => first.get("url").and_then(scalar),
            other => scalar(other),
        }),
        Value::Object(_) => raw.get("url").and_then(scalar),
        _ => None,
    }
}

fn servings(raw: &Value) -> Option<String> {
    match raw {
        Value::Array(items) => items.first().and_then(scalar),
        other => scalar(other),
    }
}

fn string_list(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items.iter().filter_map(scalar).collect(),
        Some(other) => scalar(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn flatten_instructions(raw: &Value, out: &mut Vec<String>) {
    match raw {
        Value::Array(items) => {
            for item in items {
                flatten_instructions(item, out);
            }
        }
        Value::String(_) => out.extend(scalar(raw)),
        Value::Object(_) => {
            if has_type(raw, SECTION_TYPE) {
                if let Some(steps) = raw.get("itemListElement") {
                    flatten_instructions(steps, out);
                    return;
                }
            }
            out.extend(field(raw, "text").or_else(|| field(raw, "name")));
        }
        _ => {}
    }
}

/// Map a `Recipe` node onto extracted fields.
pub fn fields_from_node(node: &Value) -> ExtractedFields {
    let mut instructions = Vec::new();
    if let Some(raw) = node.get("recipeInstructions") {
        flatten_instructions(raw, &mut instructions);
    }

    ExtractedFields {
        title: field(node, "name"),
        image: node.get("image").and_then(image_url),
        description: field(node, "description"),
        prep_time: field(node, "prepTime").map(|d| normalize_duration(&d)),
        cook_time: field(node, "cookTime").map(|d| normalize_duration(&d)),
        total_time: field(node, "totalTime").map(|d| normalize_duration(&d)),
        servings: node.get("recipeYield").and_then(servings),
        ingredients: string_list(node.get("recipeIngredient")),
        instructions,
    }
}

/// Schema.org JSON-LD extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLdExtractor;

impl JsonLdExtractor {
    /// Create the extractor
    pub fn new() -> Self {
        Self
    }

    /// Find the first `Recipe` node across all blocks, in document order.
    pub fn find_recipe_node(doc: &Html) -> Option<Value> {
        for script in doc.select(&LD_JSON_SELECTOR) {
            let raw = script.text().collect::<String>();
            match LdBlock::parse(&raw) {
                LdBlock::Parsed(nodes) => {
                    if let Some(node) = nodes.into_iter().find(|n| has_type(n, RECIPE_TYPE)) {
                        return Some(node);
                    }
                }
                LdBlock::Malformed => continue,
            }
        }
        None
    }
}

impl RecipeExtractor for JsonLdExtractor {
    fn layer(&self) -> ExtractionLayer {
        ExtractionLayer::JsonLd
    }

    fn attempt(&self, doc: &Html) -> Option<ExtractedFields> {
        Self::find_recipe_node(doc).map(|node| fields_from_node(&node))
    }
}
