//! API clients for external services
//!
//! - Catalog: podcast metadata keyed by identifier

pub mod catalog;

pub use catalog::{CatalogClient, CatalogError, PodcastSource, DEFAULT_CATALOG_URL};
