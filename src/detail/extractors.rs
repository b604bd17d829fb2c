//! Per-field extractors for the parts of a detail page that do not depend
//! on the product details layout

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::errors::{ExtractError, Extracted};
use crate::document::{element_text, element_text_excluding, has_class, own_text};
use crate::record::SeriesInfo;
use crate::utils::{after_last, collapse_whitespace};

static CANONICAL_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"link[rel="canonical"][href]"#)
        .expect("BUG: hardcoded canonical link selector is invalid")
});

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1#title").expect("BUG: hardcoded title selector is invalid")
});

static LEGACY_TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1.parseasinTitle").expect("BUG: hardcoded legacy title selector is invalid")
});

static ASIN_TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#btAsinTitle").expect("BUG: hardcoded btAsinTitle selector is invalid")
});

static UNPADDED_TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[style="padding-left: 0"]"#)
        .expect("BUG: hardcoded unpadded title selector is invalid")
});

static CONTRIBUTOR_SELECTORS: LazyLock<[Selector; 2]> = LazyLock::new(|| {
    [
        Selector::parse("#byline .author .contributorNameID")
            .expect("BUG: hardcoded contributor selector is invalid"),
        Selector::parse("#byline .author a.a-link-normal")
            .expect("BUG: hardcoded contributor link selector is invalid"),
    ]
});

static RATING_WIDGET_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        r#"div[data-feature-name="averageCustomerReviews"]"#,
        r#"div[class="jumpBar"] span.asinReviewsSummary"#,
        r#"div[class="buying"] span.asinReviewsSummary"#,
        r#"span[class="crAvgStars"] span.asinReviewsSummary"#,
    ]
    .iter()
    .map(|css| Selector::parse(css).expect("BUG: hardcoded rating widget selector is invalid"))
    .collect()
});

static TITLED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[title]").expect("BUG: hardcoded title attribute selector is invalid")
});

static BUYING_BLOCK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div#ps-content > div[class="buying"]"#)
        .expect("BUG: hardcoded buying block selector is invalid")
});

static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("BUG: hardcoded h2 selector is invalid"));

static TAG_ENTRY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul li").expect("BUG: hardcoded tag entry selector is invalid"));

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("BUG: hardcoded link selector is invalid"));

static BRACKETED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[(\[].*[)\]]").expect("BRACKETED_RE: hardcoded regex is valid")
});

static RATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^平均\s*([0-9.]+)\s*星").expect("RATING_RE: hardcoded regex is valid")
});

static SERIES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|\s*Series\s*:\s*(?P<series>.+?)\s+\(Book\s*(?P<index>[0-9.]+)\s*\)")
        .expect("SERIES_RE: hardcoded regex is valid")
});

/// Heading above the related-categories list
const SIMILAR_ITEMS_HEADING: &str = "查找其它相似商品";

/// Store navigation labels that are never tags
const EXCLUDED_TAGS: &[&str] = &[
    "kindle电子书",
    "by authors",
    "authors & illustrators",
    "books",
    "new; used & rental textbooks",
];

/// Words that disqualify a tag wherever they appear in it
const EXCLUDED_TAG_TOKENS: &[&str] = &["kindle", "a-z"];

/// Edition identifier from the canonical link's last path segment
pub fn primary_id(document: &Html) -> Extracted<String> {
    Ok(document
        .select(&CANONICAL_LINK_SELECTOR)
        .filter_map(|link| link.value().attr("href"))
        .map(|href| after_last(href.trim(), '/').to_string())
        .find(|id| !id.is_empty()))
}

pub fn title(document: &Html) -> Extracted<String> {
    let raw = if let Some(h1) = document.select(&TITLE_SELECTOR).next() {
        element_text_excluding(h1, |child| {
            child.parent().map(|p| p.id()) == Some(h1.id()) && has_class(child, "a-color-secondary")
        })
    } else {
        let Some(heading) = document.select(&LEGACY_TITLE_SELECTOR).next() else {
            return Ok(None);
        };
        let wrapper = heading
            .select(&ASIN_TITLE_SELECTOR)
            .next()
            .ok_or(ExtractError::MissingElement("#btAsinTitle"))?;
        match wrapper.select(&UNPADDED_TITLE_SELECTOR).next() {
            Some(actual) => element_text(actual),
            None => element_text(heading),
        }
    };
    Ok(strip_edition_qualifier(&raw))
}

/// Remove a bracketed edition qualifier such as `(平装)` or `[Kindle版]`
fn strip_edition_qualifier(raw: &str) -> Option<String> {
    let stripped = BRACKETED_RE.replace(raw, "").trim().to_string();
    let title = if stripped.is_empty() {
        raw.rsplit_once('[').map(|(head, _)| head.trim().to_string()).unwrap_or_default()
    } else {
        stripped
    };
    (!title.is_empty()).then_some(title)
}

pub fn authors(document: &Html) -> Extracted<Vec<String>> {
    for selector in CONTRIBUTOR_SELECTORS.iter() {
        let names: Vec<String> = document
            .select(selector)
            .map(element_text)
            .filter(|name| !name.is_empty())
            .collect();
        if !names.is_empty() {
            return Ok(Some(names));
        }
    }

    let Some(heading) = document.select(&LEGACY_TITLE_SELECTOR).next() else {
        return Ok(None);
    };
    let siblings: Vec<ElementRef<'_>> = heading.next_siblings().filter_map(ElementRef::wrap).collect();
    let nested: Vec<ElementRef<'_>> = siblings
        .iter()
        .filter(|s| s.value().name() == "span")
        .flat_map(|s| s.children().filter_map(ElementRef::wrap))
        .filter(|e| is_contributor_element(*e))
        .collect();
    let contributors = if nested.is_empty() {
        siblings.into_iter().filter(|e| is_contributor_element(*e)).collect()
    } else {
        nested
    };

    let names: Vec<String> = contributors
        .into_iter()
        .map(element_text)
        .filter(|name| !name.is_empty())
        .collect();
    Ok((!names.is_empty()).then_some(names))
}

fn is_contributor_element(element: ElementRef<'_>) -> bool {
    let value = element.value();
    match value.name() {
        "a" => value.attr("href").is_some(),
        "span" => value.attr("class") == Some("contributorNameTrigger"),
        _ => false,
    }
}

/// Average rating on a 0-5 scale from the first rating widget present
pub fn rating(document: &Html) -> Extracted<f64> {
    let Some(widget) = RATING_WIDGET_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next())
    else {
        return Ok(None);
    };

    for titled in widget.select(&TITLED_SELECTOR) {
        let Some(title) = titled.value().attr("title") else {
            continue;
        };
        let title = title.trim();
        if let Some(caps) = RATING_RE.captures(title) {
            let value = caps[1].parse::<f64>().ok().filter(|v| (0.0..=5.0).contains(v));
            return value.map(Some).ok_or_else(|| ExtractError::InvalidValue {
                field: "rating",
                value: title.to_string(),
            });
        }
    }
    Ok(None)
}

/// Series name and index from the buying block, always as a pair
pub fn series(document: &Html) -> Extracted<SeriesInfo> {
    let Some(block) = document.select(&BUYING_BLOCK_SELECTOR).next() else {
        return Ok(None);
    };
    let text = collapse_whitespace(&block.text().collect::<String>());
    let Some(caps) = SERIES_RE.captures(&text) else {
        return Ok(None);
    };

    let name = caps["series"].trim().to_string();
    let index = caps["index"].parse::<f64>().map_err(|_| ExtractError::InvalidValue {
        field: "series index",
        value: caps["index"].to_string(),
    })?;
    Ok((!name.is_empty()).then_some(SeriesInfo { name, index }))
}

/// Related categories, minus the broad first level and store navigation
pub fn tags(document: &Html) -> Extracted<Vec<String>> {
    let Some(section) = document
        .select(&HEADING_SELECTOR)
        .find(|h2| element_text(*h2) == SIMILAR_ITEMS_HEADING)
        .and_then(|h2| h2.parent())
        .and_then(ElementRef::wrap)
    else {
        return Ok(None);
    };

    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for entry in section.select(&TAG_ENTRY_SELECTOR) {
        for link in entry.select(&LINK_SELECTOR).skip(1) {
            let raw = own_text(link).unwrap_or_default().trim().replace(',', ";");
            let lowered = raw.to_lowercase();
            if raw.is_empty()
                || EXCLUDED_TAGS.contains(&lowered.as_str())
                || lowered.split_whitespace().any(|t| EXCLUDED_TAG_TOKENS.contains(&t))
                || !seen.insert(lowered)
            {
                continue;
            }
            tags.push(raw);
        }
    }
    Ok(Some(tags))
}
