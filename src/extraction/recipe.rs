//! Recipe data model
//!
//! [`ExtractedFields`] is the per-layer partial result; [`Recipe`] is the
//! immutable record assembled from the winning layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title used when no layer produced one.
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// The extraction layer that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionLayer {
    /// Schema.org JSON-LD script blocks
    JsonLd,
    /// Schema.org microdata attributes
    Microdata,
    /// DOM heuristics (plugin class names, list-after-heading)
    Heuristic,
}

impl ExtractionLayer {
    /// All layers in precedence order.
    pub const ALL: [ExtractionLayer; 3] = [
        ExtractionLayer::JsonLd,
        ExtractionLayer::Microdata,
        ExtractionLayer::Heuristic,
    ];

    /// Stable lowercase name, used in logs and status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionLayer::JsonLd => "json_ld",
            ExtractionLayer::Microdata => "microdata",
            ExtractionLayer::Heuristic => "heuristic",
        }
    }
}

impl std::fmt::Display for ExtractionLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields produced by a single extraction layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    /// Recipe name
    pub title: Option<String>,
    /// Image URL
    pub image: Option<String>,
    /// Short description
    pub description: Option<String>,
    /// Normalized preparation time
    pub prep_time: Option<String>,
    /// Normalized cooking time
    pub cook_time: Option<String>,
    /// Normalized total time
    pub total_time: Option<String>,
    /// Yield / servings
    pub servings: Option<String>,
    /// Ingredient lines in document order
    pub ingredients: Vec<String>,
    /// Instruction steps in document order
    pub instructions: Vec<String>,
}

impl ExtractedFields {
    /// True when a layer matched something but found no title, ingredients
    /// or instructions. Such a match is treated as "no data" so a stray type
    /// marker cannot yield an empty recipe.
    pub fn is_empty_match(&self) -> bool {
        self.title.is_none() && self.ingredients.is_empty() && self.instructions.is_empty()
    }

    /// True when either the ingredient or instruction list is empty.
    pub fn is_partial(&self) -> bool {
        self.ingredients.is_empty() || self.instructions.is_empty()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A normalized recipe record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique identifier
    pub id: String,
    /// Source page URL
    pub url: String,
    /// Recipe name (defaults to [`UNTITLED_RECIPE`])
    pub title: String,
    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Preparation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    /// Cooking time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    /// Total time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    /// Yield / servings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    /// Ingredient lines
    pub ingredients: Vec<String>,
    /// Instruction steps
    pub instructions: Vec<String>,
    /// When the record was created
    pub saved_at: DateTime<Utc>,
    /// Set when ingredients or instructions came back empty
    #[serde(default, skip_serializing_if = "is_false")]
    pub partial: bool,
}

impl Recipe {
    /// Assemble the final record from one layer's fields.
    pub fn assemble(fields: ExtractedFields, url: &str) -> Self {
        let partial = fields.is_partial();
        let ExtractedFields {
            title,
            image,
            description,
            prep_time,
            cook_time,
            total_time,
            servings,
            ingredients,
            instructions,
        } = fields;

        Self {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            title: title.unwrap_or_else(|| UNTITLED_RECIPE.to_string()),
            image,
            description,
            prep_time,
            cook_time,
            total_time,
            servings,
            ingredients,
            instructions,
            saved_at: Utc::now(),
            partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_fields() -> ExtractedFields {
        ExtractedFields {
            title: Some("Pancakes".to_string()),
            ingredients: vec!["flour".to_string(), "milk".to_string()],
            instructions: vec!["Mix".to_string(), "Fry".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_match_predicate() {
        assert!(ExtractedFields::default().is_empty_match());

        let titled = ExtractedFields {
            title: Some("Soup".to_string()),
            ..Default::default()
        };
        assert!(!titled.is_empty_match());

        let steps_only = ExtractedFields {
            instructions: vec!["Boil".to_string()],
            ..Default::default()
        };
        assert!(!steps_only.is_empty_match());
    }

    #[test]
    fn test_assemble_complete() {
        let recipe = Recipe::assemble(complete_fields(), "https://example.com/pancakes");
        assert_eq!(recipe.title, "Pancakes");
        assert_eq!(recipe.url, "https://example.com/pancakes");
        assert!(!recipe.partial);
        assert!(Uuid::parse_str(&recipe.id).is_ok());
    }

    #[test]
    fn test_assemble_defaults_title_and_flags_partial() {
        let fields = ExtractedFields {
            ingredients: vec!["salt".to_string()],
            ..Default::default()
        };
        let recipe = Recipe::assemble(fields, "https://example.com");
        assert_eq!(recipe.title, UNTITLED_RECIPE);
        assert!(recipe.partial);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Recipe::assemble(complete_fields(), "https://example.com");
        let b = Recipe::assemble(complete_fields(), "https://example.com");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let recipe = Recipe::assemble(complete_fields(), "https://example.com");
        let json = serde_json::to_value(&recipe).unwrap();

        assert!(json.get("savedAt").is_some());
        assert!(json.get("image").is_none());
        assert!(json.get("prepTime").is_none());
        assert!(json.get("partial").is_none());
        assert_eq!(json["ingredients"], serde_json::json!(["flour", "milk"]));
    }

    #[test]
    fn test_serialization_includes_partial_when_set() {
        let fields = ExtractedFields {
            title: Some("Bare".to_string()),
            prep_time: Some("10m".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(Recipe::assemble(fields, "https://example.com")).unwrap();
        assert_eq!(json["partial"], serde_json::json!(true));
        assert_eq!(json["prepTime"], serde_json::json!("10m"));
    }

    #[test]
    fn test_layer_names() {
        assert_eq!(ExtractionLayer::JsonLd.to_string(), "json_ld");
        assert_eq!(
            serde_json::to_string(&ExtractionLayer::Heuristic).unwrap(),
            "\"heuristic\""
        );
    }
}
