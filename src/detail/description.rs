//! Description extraction and sanitizing
//!
//! The description is re-serialized from the DOM through a small whitelist:
//! attributes are dropped, links become spans, unknown elements are
//! unwrapped to their children and storefront widgets are removed outright.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

use super::errors::Extracted;
use crate::document::has_class;

static FEATURE_NOSCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#bookDescription_feature_div noscript")
        .expect("BUG: hardcoded description noscript selector is invalid")
});

static PS_CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div#ps-content > div.content")
        .expect("BUG: hardcoded ps-content selector is invalid")
});

static PRODUCT_DESCRIPTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div#productDescription > .content")
        .expect("BUG: hardcoded product description selector is invalid")
});

const KEPT_ELEMENTS: &[&str] = &[
    "p", "div", "span", "b", "strong", "i", "em", "u", "s", "sub", "sup", "ul", "ol", "li", "blockquote",
    "h1", "h2", "h3", "h4", "h5", "h6", "table", "tr", "td", "th", "tbody", "thead",
];

const VOID_ELEMENTS: &[&str] = &["br", "hr"];

const DROPPED_ELEMENTS: &[&str] = &["noscript", "script", "style", "iframe", "form", "img"];

const REMOVED_CLASSES: &[&str] = &["seeAll", "emptyClear"];

const REMOVED_IDS: &[&str] = &["collapsePS", "expandPS"];

const OUT_OF_PRINT_NOTICE: &str = "--This text ref";

/// Sanitized description HTML, if the page has one
pub fn description(document: &Html) -> Extracted<String> {
    if let Some(noscript) = document.select(&FEATURE_NOSCRIPT_SELECTOR).next() {
        // With scripting enabled html5ever keeps noscript content as raw text
        let has_elements = noscript.children().any(|c| c.value().is_element());
        let rendered = if has_elements {
            render(noscript)
        } else {
            let markup: String = noscript.text().collect();
            let fragment = Html::parse_fragment(&markup);
            render(fragment.root_element())
        };
        return Ok(non_empty(rendered));
    }

    let mut out = String::new();
    if let Some(content) = document.select(&PS_CONTENT_SELECTOR).next() {
        out.push_str(&render(content));
    }
    if let Some(content) = document.select(&PRODUCT_DESCRIPTION_SELECTOR).next() {
        out.push_str(&render(content));
    }
    Ok(non_empty(out))
}

/// Render `root` and its children as sanitized HTML wrapped in a `div`
#[must_use]
pub fn render(root: ElementRef<'_>) -> String {
    let mut out = String::from("<div>");
    render_children(*root, &mut out);
    out.push_str("</div>");
    out.replace('\u{FFFD}', "'")
}

fn render_children(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&html_escape::encode_text(&**text)),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    render_element(element, out);
                }
            }
            _ => {}
        }
    }
}

fn render_element(element: ElementRef<'_>, out: &mut String) {
    let value = element.value();
    let name = value.name();

    if DROPPED_ELEMENTS.contains(&name)
        || REMOVED_CLASSES.iter().any(|c| has_class(element, c))
        || value.id().is_some_and(|id| REMOVED_IDS.contains(&id))
        || (name == "em" && element.text().collect::<String>().trim_start().starts_with(OUT_OF_PRINT_NOTICE))
    {
        return;
    }

    if VOID_ELEMENTS.contains(&name) {
        out.push('<');
        out.push_str(name);
        out.push('>');
        return;
    }

    let tag = if name == "a" { "span" } else { name };
    if KEPT_ELEMENTS.contains(&tag) {
        out.push('<');
        out.push_str(tag);
        out.push('>');
        render_children(*element, out);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    } else {
        render_children(*element, out);
    }
}

fn non_empty(rendered: String) -> Option<String> {
    let fragment = Html::parse_fragment(&rendered);
    let has_text = fragment.root_element().text().any(|t| !t.trim().is_empty());
    has_text.then(|| rendered.trim().to_string())
}
