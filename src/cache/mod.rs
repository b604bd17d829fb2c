//! Cross-call identifier and cover cache
//!
//! Two process-lifetime mappings written by detail workers and read by the
//! cover shortcut: ISBN → edition identifier and edition identifier → cover
//! URL. Writes are last-write-wins; every entry is an independent insert.

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::query::{check_isbn, primary_identifier};
use crate::utils::ISBN_KEY;

/// Shared handle; clones see the same entries
#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    isbn_to_identifier: Arc<DashMap<String, String>>,
    identifier_to_cover_url: Arc<DashMap<String, String>>,
}

impl MetadataCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_isbn_to_identifier(&self, isbn: &str, identifier: &str) {
        log::debug!("Caching ISBN {isbn} -> {identifier}");
        self.isbn_to_identifier
            .insert(isbn.to_string(), identifier.to_string());
    }

    #[must_use]
    pub fn cached_isbn_to_identifier(&self, isbn: &str) -> Option<String> {
        self.isbn_to_identifier.get(isbn).map(|e| e.value().clone())
    }

    pub fn cache_identifier_to_cover_url(&self, identifier: &str, url: &str) {
        log::debug!("Caching cover for {identifier}: {url}");
        self.identifier_to_cover_url
            .insert(identifier.to_string(), url.to_string());
    }

    #[must_use]
    pub fn cached_identifier_to_cover_url(&self, identifier: &str) -> Option<String> {
        self.identifier_to_cover_url
            .get(identifier)
            .map(|e| e.value().clone())
    }

    /// Cover URL for a set of identifiers, without touching the network
    ///
    /// The edition identifier is taken directly when present, otherwise it
    /// is looked up through the ISBN.
    #[must_use]
    pub fn cached_cover_url(
        &self,
        config: &CatalogConfig,
        identifiers: &BTreeMap<String, String>,
    ) -> Option<String> {
        let identifier = primary_identifier(config, identifiers)
            .map(str::to_string)
            .or_else(|| {
                identifiers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(ISBN_KEY))
                    .and_then(|(_, v)| check_isbn(v))
                    .and_then(|isbn| self.cached_isbn_to_identifier(&isbn))
            })?;
        let url = self.cached_identifier_to_cover_url(&identifier);
        if url.is_none() {
            log::trace!("No cached cover for {identifier}");
        }
        url
    }

    #[must_use]
    pub fn entry_counts(&self) -> (usize, usize) {
        (self.isbn_to_identifier.len(), self.identifier_to_cover_url.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isbn_resolves_cover_through_identifier() {
        let cache = MetadataCache::new();
        let config = CatalogConfig::default();
        cache.cache_isbn_to_identifier("9787536692930", "B00ABC1234");
        cache.cache_identifier_to_cover_url("B00ABC1234", "https://img.example/1.jpg");

        let by_isbn = BTreeMap::from([("isbn".to_string(), "978-7-5366-9293-0".to_string())]);
        assert_eq!(
            cache.cached_cover_url(&config, &by_isbn).as_deref(),
            Some("https://img.example/1.jpg")
        );

        let by_asin = BTreeMap::from([("ASIN".to_string(), "B00ABC1234".to_string())]);
        assert!(cache.cached_cover_url(&config, &by_asin).is_some());
        assert_eq!(cache.entry_counts(), (1, 1));
    }

    #[test]
    fn clones_share_entries() {
        let cache = MetadataCache::new();
        cache.clone().cache_isbn_to_identifier("9787020002207", "B001");
        assert_eq!(cache.cached_isbn_to_identifier("9787020002207").as_deref(), Some("B001"));
    }
}
