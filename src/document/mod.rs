//! Text helpers over `scraper` documents
//!
//! The catalog's markup puts values in places CSS selectors cannot reach on
//! their own: the bare text right after a `<b>Label:</b>`, or an element's
//! text minus a decorative child. These helpers walk the `ego_tree` nodes
//! directly for those cases.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};

use crate::utils::collapse_whitespace;

/// Page marker for the storefront's not-found template
pub const NOT_FOUND_TITLE_MARKER: &str = "<title>404 - ";

/// All text below `element`, whitespace-collapsed
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Text below `element`, skipping every subtree whose root matches `skip`
#[must_use]
pub fn element_text_excluding<F>(element: ElementRef<'_>, skip: F) -> String
where
    F: Fn(ElementRef<'_>) -> bool,
{
    fn walk<F>(node: NodeRef<'_, Node>, skip: &F, out: &mut String)
    where
        F: Fn(ElementRef<'_>) -> bool,
    {
        for child in node.children() {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child)
                        && !skip(el)
                    {
                        walk(child, skip, out);
                    }
                }
                _ => {}
            }
        }
    }

    let mut out = String::new();
    walk(*element, &skip, &mut out);
    collapse_whitespace(&out)
}

/// Text nodes directly following `element`, up to the next sibling element
///
/// This is the label/value idiom of `<b>Publisher:</b> Some Press (2005)`.
#[must_use]
pub fn tail_text(element: ElementRef<'_>) -> Option<String> {
    let mut out = String::new();
    let mut next = element.next_sibling();
    while let Some(node) = next {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Comment(_) => {}
            _ => break,
        }
        next = node.next_sibling();
    }
    let out = out.trim();
    (!out.is_empty()).then(|| out.to_string())
}

/// First direct text child of `element`, untrimmed
#[must_use]
pub fn own_text(element: ElementRef<'_>) -> Option<&str> {
    element.children().find_map(|child| match child.value() {
        Node::Text(text) => Some(&**text),
        _ => None,
    })
}

/// Whether the element's first direct text child starts with `prefix`
#[must_use]
pub fn own_text_starts_with(element: ElementRef<'_>, prefix: &str) -> bool {
    own_text(element).is_some_and(|t| t.trim_start().starts_with(prefix))
}

/// Whether the element's class attribute contains `class` as one of its words
#[must_use]
pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|c| c.split_whitespace().any(|w| w == class))
}

/// Text of the page's `#errorMessage` element, if it has one
#[must_use]
pub fn error_message(document: &Html) -> Option<String> {
    static ERROR_MESSAGE: std::sync::LazyLock<Selector> = std::sync::LazyLock::new(|| {
        Selector::parse("#errorMessage").expect("BUG: hardcoded CSS selector '#errorMessage' is invalid")
    });
    document
        .select(&ERROR_MESSAGE)
        .next()
        .map(element_text)
}
