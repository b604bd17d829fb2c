//! Ordering of identify results against the original request

use crate::config::CatalogConfig;
use crate::query::{IdentifyRequest, check_isbn, primary_identifier};
use crate::record::MetadataRecord;
use crate::utils::ISBN_KEY;

/// Sort key for one record; smaller is a better match
///
/// Field order is the precedence: edition identifier, ISBN, title, author,
/// cover availability, then the catalog's own relevance rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchKey {
    identifier_mismatch: bool,
    isbn_mismatch: bool,
    title_mismatch: bool,
    author_mismatch: bool,
    missing_cover: bool,
    source_relevance: usize,
}

#[must_use]
pub fn match_key(
    config: &CatalogConfig,
    request: &IdentifyRequest,
    record: &MetadataRecord,
) -> MatchKey {
    let identifier_match = primary_identifier(config, &request.identifiers)
        .is_some_and(|id| id.eq_ignore_ascii_case(&record.primary_id));

    let isbn_match = request
        .identifiers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(ISBN_KEY))
        .and_then(|(_, v)| check_isbn(v))
        .is_some_and(|isbn| record.isbn() == Some(isbn.as_str()));

    let title_match = request
        .title
        .as_deref()
        .is_some_and(|title| comparable(title) == comparable(&record.title));

    let author_match = request.authors.iter().map(|a| comparable(a)).any(|wanted| {
        !wanted.is_empty() && record.authors.iter().any(|a| comparable(a) == wanted)
    });

    MatchKey {
        identifier_mismatch: !identifier_match,
        isbn_mismatch: !isbn_match,
        title_mismatch: !title_match,
        author_mismatch: !author_match,
        missing_cover: !record.has_cover(),
        source_relevance: record.source_relevance,
    }
}

/// Sort `records` best match first
pub fn rank_records(config: &CatalogConfig, request: &IdentifyRequest, records: &mut [MetadataRecord]) {
    records.sort_by_cached_key(|record| match_key(config, request, record));
}

/// Lower-cased alphanumerics only, so punctuation and spacing never matter
fn comparable(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(primary_id: &str, title: &str, relevance: usize) -> MetadataRecord {
        MetadataRecord {
            title: title.to_string(),
            authors: vec!["刘慈欣".to_string()],
            primary_id: primary_id.to_string(),
            identifiers: BTreeMap::from([("amazon_cn".to_string(), primary_id.to_string())]),
            rating: None,
            description: None,
            publisher: None,
            published: None,
            language: None,
            series: None,
            tags: Vec::new(),
            cover_url: None,
            source_relevance: relevance,
        }
    }

    #[test]
    fn identifier_match_beats_relevance() {
        let config = CatalogConfig::default();
        let request = IdentifyRequest::new()
            .with_title("三体")
            .with_identifier("asin", "B002");
        let mut records = vec![record("B001", "三体", 0), record("B002", "三体II", 3)];
        rank_records(&config, &request, &mut records);
        assert_eq!(records[0].primary_id, "B002");
    }

    #[test]
    fn exact_title_then_relevance() {
        let config = CatalogConfig::default();
        let request = IdentifyRequest::new().with_title("三体：地球往事");
        let mut records = vec![
            record("B001", "三体 全集", 0),
            record("B002", "三体 地球往事", 2),
            record("B003", "三体地球往事", 1),
        ];
        rank_records(&config, &request, &mut records);
        let order: Vec<_> = records.iter().map(|r| r.primary_id.as_str()).collect();
        assert_eq!(order, vec!["B003", "B002", "B001"]);
    }
}
