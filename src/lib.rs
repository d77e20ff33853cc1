pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod conformance;
pub mod coordinates;
pub mod error;
pub mod extract;
pub mod fits;
pub mod header;
pub mod walk;

#[cfg(test)]
mod test_support;

// Re-export commonly used items
pub use catalog::{AliasTable, KeyCatalog};
pub use extract::{MetadataExtractor, MetadataPair, ResultList};
pub use fits::{FitsFile, FitsReader, HeaderProvider};
pub use header::{HeaderMapping, HeaderValue};
