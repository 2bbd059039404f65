//! Queryable document helpers
//!
//! Thin helpers over `scraper` shared by the microdata and heuristic layers:
//! trimmed text, non-empty attribute reads, and element-only sibling walks.

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractionError;

/// Parse the fetched HTML into a queryable document.
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Compile a CSS selector, reporting failures as [`ExtractionError::InvalidSelector`].
pub fn compile_selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::InvalidSelector(format!("{}: {}", css, e)))
}

/// All descendant text of an element, trimmed.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Trimmed text, or `None` when nothing is left after trimming.
pub fn non_empty_text(el: ElementRef<'_>) -> Option<String> {
    Some(element_text(el)).filter(|t| !t.is_empty())
}

/// Trimmed attribute value, or `None` when missing or blank.
pub fn non_empty_attr(el: ElementRef<'_>, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// First element matching `selector` anywhere in the document.
pub fn first_match<'a>(doc: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    doc.select(selector).next()
}

/// Non-empty trimmed texts of every match, in document order.
pub fn collect_texts(doc: &Html, selector: &Selector) -> Vec<String> {
    doc.select(selector).filter_map(non_empty_text).collect()
}

/// The element siblings that follow `el`, skipping text and comment nodes.
pub fn following_elements(el: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    el.next_siblings().filter_map(ElementRef::wrap)
}

/// Whether `el` is a `ul` or `ol`.
pub fn is_list(el: ElementRef<'_>) -> bool {
    matches!(el.value().name(), "ul" | "ol")
}

/// Non-empty trimmed texts of the direct `li` children of a list.
pub fn list_item_texts(list: ElementRef<'_>) -> Vec<String> {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .filter_map(non_empty_text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_text_trims() {
        let doc = parse_document("<p>  hello <b>world</b>  </p>");
        let sel = compile_selector("p").unwrap();
        let p = first_match(&doc, &sel).unwrap();
        assert_eq!(element_text(p), "hello world");
    }

    #[test]
    fn test_non_empty_attr_blank_is_none() {
        let doc = parse_document(r#"<meta name="a" content="   "><meta name="b" content=" x ">"#);
        let a = first_match(&doc, &compile_selector(r#"meta[name="a"]"#).unwrap()).unwrap();
        let b = first_match(&doc, &compile_selector(r#"meta[name="b"]"#).unwrap()).unwrap();
        assert_eq!(non_empty_attr(a, "content"), None);
        assert_eq!(non_empty_attr(b, "content"), Some("x".to_string()));
        assert_eq!(non_empty_attr(b, "missing"), None);
    }

    #[test]
    fn test_invalid_selector() {
        let err = compile_selector("p[").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidSelector(_)));
    }

    #[test]
    fn test_following_elements_skip_text() {
        let doc = parse_document("<div><h2>A</h2> text <p>1</p><!-- c --><ul><li>x</li></ul></div>");
        let h2 = first_match(&doc, &compile_selector("h2").unwrap()).unwrap();
        let names: Vec<_> = following_elements(h2).map(|e| e.value().name().to_string()).collect();
        assert_eq!(names, vec!["p", "ul"]);
    }

    #[test]
    fn test_list_item_texts_direct_children_only() {
        let doc = parse_document(
            "<ul><li>one</li><li> </li><li>two<ul><li>nested</li></ul></li></ul>",
        );
        let ul = first_match(&doc, &compile_selector("ul").unwrap()).unwrap();
        let items = list_item_texts(ul);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], "one");
        assert!(items[1].starts_with("two"));
    }
}
