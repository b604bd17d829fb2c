//! Tests for the catalog configuration builder

use kodegen_tools_bookmeta::CatalogConfig;
use std::time::Duration;

mod common;

#[test]
fn defaults_target_the_live_storefront() {
    let config = CatalogConfig::builder().build().unwrap();
    assert_eq!(config.base_url().as_str(), "https://www.amazon.cn/");
    assert_eq!(config.max_editions(), 5);
    assert_eq!(config.worker_stagger(), Duration::from_millis(100));
    assert_eq!(config.poll_interval(), Duration::from_millis(200));
    assert_eq!(config.default_timeout(), Duration::from_secs(30));
    assert_eq!(config.primary_identifier_key(), "amazon_cn");
    assert_eq!(config.identifier_aliases(), ["amazon_cn", "asin"]);
    assert_eq!(config.locale_marker(), ("__mk_zh_CN", "亚马逊网站"));
}

#[test]
fn default_impl_matches_builder_defaults() {
    let built = CatalogConfig::builder().build().unwrap();
    let default = CatalogConfig::default();
    assert_eq!(built.base_url(), default.base_url());
    assert_eq!(built.rejected_title_markers(), default.rejected_title_markers());
}

#[test]
fn derived_urls() {
    let config = common::test_config();
    assert_eq!(config.detail_url("B00ABC1234"), "https://catalog.test/dp/B00ABC1234");
    assert_eq!(
        config.direct_cover_url("B00ABC1234"),
        "https://images.test/P/B00ABC1234.01.MAIN._SCRM_.jpg"
    );
}

#[test]
fn invalid_settings_are_rejected() {
    assert!(CatalogConfig::builder().base_url("not a url").build().is_err());
    assert!(CatalogConfig::builder().base_url("ftp://catalog.test").build().is_err());
    assert!(CatalogConfig::builder().image_base_url("/images/P/").build().is_err());
    assert!(CatalogConfig::builder().max_editions(0).build().is_err());
    assert!(CatalogConfig::builder().poll_interval(Duration::ZERO).build().is_err());
    assert!(
        CatalogConfig::builder()
            .identifier_aliases(Vec::<String>::new())
            .build()
            .is_err()
    );
}

#[test]
fn config_round_trips_through_json() {
    let config = common::test_config();
    let json = serde_json::to_string(&config).unwrap();
    let restored: CatalogConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.base_url(), config.base_url());
    assert_eq!(restored.poll_interval(), config.poll_interval());
}
