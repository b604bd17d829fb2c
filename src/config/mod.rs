//! Configuration module for catalog lookups
//!
//! This module provides the `CatalogConfig` struct and its builder for
//! configuring the identify pipeline with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::CatalogConfigBuilder;
pub use types::CatalogConfig;
