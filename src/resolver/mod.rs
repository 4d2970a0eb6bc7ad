//! Package resolution.
//!
//! Imports are resolved against a catalog of exported packages. Resolution is
//! pure: all I/O happens while the catalog is refreshed from its sources.

pub mod catalog;

pub use catalog::{BundleCatalog, CatalogEntry, Exporter, RefreshReport};
