//! Product details layouts
//!
//! ISBN, publisher, publication date and language live in one of two
//! markup shapes: a two-column table (current pages) or label/value text in
//! a "基本信息" block (older pages). The shape is probed once per page and
//! every field is then read through the same [`DetailLayout`] methods.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::dates::parse_date;
use super::errors::{ExtractError, Extracted};
use super::language::resolve_language;
use crate::document::{element_text, own_text_starts_with, tail_text};
use crate::query::check_isbn;
use crate::utils::{after_last, before_first};

static NON_HERO_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div#bookDetails_container_div div#nonHeroSection")
        .expect("BUG: hardcoded non-hero section selector is invalid")
});

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("BUG: hardcoded table selector is invalid"));

static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("BUG: hardcoded row selector is invalid"));

static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("BUG: hardcoded cell selector is invalid"));

static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("BUG: hardcoded h2 selector is invalid"));

static CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[class="content"]"#).expect("BUG: hardcoded content selector is invalid")
});

static ANY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("*").expect("BUG: hardcoded universal selector is invalid"));

static BOLD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("b").expect("BUG: hardcoded b selector is invalid"));

const LEGACY_HEADING: &str = "基本信息";
const PUBLISHER_LABEL: &str = "出版社";
const LANGUAGE_LABEL: &str = "语种";
const ISBN_LABELS: &[&str] = &["ISBN", "ISBN-10", "ISBN-13"];
const LEGACY_PUBLISHER_PREFIXES: &[&str] = &["出版社:", "出版社："];
const LEGACY_LANGUAGE_PREFIXES: &[&str] = &["语种：", "语种:"];

/// The product details shape of one detail page
#[derive(Debug, Clone)]
pub enum DetailLayout<'a> {
    /// Label/value rows of the details table
    Table(Vec<(String, String)>),
    /// The content block under the "基本信息" heading
    Legacy(ElementRef<'a>),
}

impl<'a> DetailLayout<'a> {
    /// Pick the layout of `document`
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::MissingElement` when neither shape is present,
    /// or when the details section has no table.
    pub fn probe(document: &'a Html) -> Result<Self, ExtractError> {
        if let Some(section) = document.select(&NON_HERO_SELECTOR).next() {
            let table = section
                .select(&TABLE_SELECTOR)
                .next()
                .ok_or(ExtractError::MissingElement("details table"))?;
            let rows = table
                .select(&ROW_SELECTOR)
                .filter_map(|row| {
                    let cells: Vec<_> = row.select(&CELL_SELECTOR).collect();
                    let [label, value] = cells.as_slice() else {
                        return None;
                    };
                    let label = element_text(*label).trim_end_matches([':', '：']).trim().to_string();
                    let value = element_text(*value);
                    (!value.is_empty()).then_some((label, value))
                })
                .collect();
            return Ok(Self::Table(rows));
        }

        document
            .select(&HEADING_SELECTOR)
            .find(|h2| own_text_starts_with(*h2, LEGACY_HEADING))
            .and_then(|h2| h2.parent())
            .and_then(ElementRef::wrap)
            .and_then(|parent| {
                parent
                    .children()
                    .filter_map(ElementRef::wrap)
                    .find(|child| CONTENT_SELECTOR.matches(child))
            })
            .map(Self::Legacy)
            .ok_or(ExtractError::MissingElement("product details"))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::Legacy(_) => "legacy",
        }
    }

    /// Checksum-valid ISBN; invalid candidates count as absent
    pub fn isbn(&self) -> Extracted<String> {
        let found = match self {
            Self::Table(rows) => rows
                .iter()
                .rev()
                .filter(|(label, _)| ISBN_LABELS.contains(&label.as_str()))
                .find_map(|(_, value)| check_isbn(value)),
            Self::Legacy(block) => {
                let mut labels: Vec<ElementRef<'a>> = block
                    .select(&ANY_SELECTOR)
                    .filter(|e| own_text_starts_with(*e, "ISBN"))
                    .collect();
                if labels.is_empty() {
                    labels = block
                        .select(&BOLD_SELECTOR)
                        .filter(|b| element_text(*b).contains("ISBN:"))
                        .collect();
                }
                labels
                    .into_iter()
                    .rev()
                    .filter_map(tail_text)
                    .find_map(|tail| check_isbn(&tail))
            }
        };
        Ok(found)
    }

    pub fn publisher(&self) -> Extracted<String> {
        Ok(self.publisher_text().and_then(|raw| {
            let name = before_first(before_first(&raw, ';'), '(').trim();
            (!name.is_empty()).then(|| name.to_string())
        }))
    }

    /// Date from the parenthesised part of the publisher entry
    pub fn published(&self) -> Extracted<NaiveDate> {
        let Some(raw) = self.publisher_text() else {
            return Ok(None);
        };
        if !raw.contains('(') {
            return Ok(None);
        }
        let date = after_last(&raw, '(').replace(')', "");
        parse_date(date.trim()).map(Some)
    }

    pub fn language(&self) -> Extracted<String> {
        let raw = match self {
            Self::Table(rows) => table_value(rows, LANGUAGE_LABEL),
            Self::Legacy(block) => legacy_tail(*block, LEGACY_LANGUAGE_PREFIXES)
                .map(|tail| before_first(&tail, ',').trim().to_string()),
        };
        match raw {
            None => Ok(None),
            Some(raw) => resolve_language(&raw).map(Some).ok_or(ExtractError::InvalidValue {
                field: "language",
                value: raw,
            }),
        }
    }

    fn publisher_text(&self) -> Option<String> {
        match self {
            Self::Table(rows) => table_value(rows, PUBLISHER_LABEL),
            Self::Legacy(block) => legacy_tail(*block, LEGACY_PUBLISHER_PREFIXES),
        }
    }
}

fn table_value(rows: &[(String, String)], label: &str) -> Option<String> {
    rows.iter().rev().find(|(l, _)| l == label).map(|(_, v)| v.clone())
}

/// Text after the last element whose own text starts with one of `prefixes`
fn legacy_tail(block: ElementRef<'_>, prefixes: &[&str]) -> Option<String> {
    let labels: Vec<ElementRef<'_>> = block
        .select(&ANY_SELECTOR)
        .filter(|e| prefixes.iter().any(|p| own_text_starts_with(*e, p)))
        .collect();
    labels.into_iter().rev().find_map(tail_text)
}
