use crate::error::ConfigError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Desired key that is replaced by the path of the file being processed
pub const FILE_PATH_KEY: &str = "file name or path";

/// Friendly metadata names and the standard header keys they stand for
const STANDARD_ALIASES: &[(&str, &str)] = &[
    ("spatial_axis_1_number_bins", "NAXIS1"),
    ("spatial_axis_2_number_bins", "NAXIS2"),
    ("start_time", "DATE-OBS"),
    ("facility_name", "INSTRUME"),
    ("instrument_name", "TELESCOP"),
    ("obs_creator_name", "OBSERVER"),
    ("obs_title", "OBJECT"),
];

/// Immutable mapping from friendly field names to canonical header keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn standard() -> Self {
        Self::from_pairs(STANDARD_ALIASES.iter().copied())
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let aliases = pairs
            .into_iter()
            .map(|(alias, key)| (alias.to_string(), key.to_string()))
            .collect();
        Self { aliases }
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// The ordered wishlist of metadata fields plus the alias table used to
/// resolve them. Built once per run and shared by reference.
#[derive(Debug, Clone)]
pub struct KeyCatalog {
    desired: Vec<String>,
    aliases: AliasTable,
}

impl KeyCatalog {
    pub fn new(desired: Vec<String>, aliases: AliasTable) -> Self {
        Self { desired, aliases }
    }

    /// Catalog with the standard alias table
    pub fn from_keys<S: Into<String>>(desired: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            desired.into_iter().map(Into::into).collect(),
            AliasTable::standard(),
        )
    }

    /// Load desired keys from a text file, one name per line
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::KeyFile {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_keys(parse_key_lines(&text));
        tracing::debug!(
            "Loaded {} metadata keys from {}",
            catalog.desired.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn desired_keys(&self) -> &[String] {
        &self.desired
    }

    pub fn resolve_alias(&self, name: &str) -> Option<&str> {
        self.aliases.resolve(name)
    }
}

/// Split catalog text into names: order and duplicates are kept, only the
/// line terminator is removed and blank lines are skipped
fn parse_key_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
