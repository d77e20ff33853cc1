use crate::catalog::{KeyCatalog, FILE_PATH_KEY};
use crate::coordinates::{self, CoordinateAxis};
use crate::header::{HeaderMapping, HeaderValue};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// One extracted metadata field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataPair {
    pub name: String,
    pub value: HeaderValue,
}

impl MetadataPair {
    pub fn new(name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for MetadataPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Ordered metadata of one file with every empty pair removed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultList {
    pairs: Vec<MetadataPair>,
}

impl ResultList {
    /// Keep only pairs with a value, preserving their relative order
    pub fn filtered(pairs: Vec<MetadataPair>) -> Self {
        Self {
            pairs: pairs.into_iter().filter(|p| !p.value.is_empty()).collect(),
        }
    }

    pub fn pairs(&self) -> &[MetadataPair] {
        &self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetadataPair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn into_pairs(self) -> Vec<MetadataPair> {
        self.pairs
    }
}

impl<'a> IntoIterator for &'a ResultList {
    type Item = &'a MetadataPair;
    type IntoIter = std::slice::Iter<'a, MetadataPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Turns a header into the ordered, filtered metadata the catalog asks for
#[derive(Debug, Clone, Copy)]
pub struct MetadataExtractor<'a> {
    catalog: &'a KeyCatalog,
}

impl<'a> MetadataExtractor<'a> {
    pub fn new(catalog: &'a KeyCatalog) -> Self {
        Self { catalog }
    }

    /// Extract every desired key of the catalog from `header`
    pub fn extract(&self, file_path: &Path, header: &HeaderMapping) -> ResultList {
        self.extract_keys(file_path, header, self.catalog.desired_keys())
    }

    /// Extract an explicit key list, resolving aliases through the catalog
    pub fn extract_keys(
        &self,
        file_path: &Path,
        header: &HeaderMapping,
        desired: &[String],
    ) -> ResultList {
        let mut pairs = Vec::with_capacity(desired.len());

        for key in desired {
            if key == FILE_PATH_KEY {
                pairs.push(MetadataPair::new(
                    FILE_PATH_KEY,
                    file_path.display().to_string(),
                ));
            } else if let Some(canonical) = self.catalog.resolve_alias(key) {
                pairs.push(MetadataPair::new(canonical, header.value_or_absent(canonical)));
            } else if let Some(axis) = CoordinateAxis::from_value_key(key) {
                let (raw, derived) = coordinates::resolve(axis, header);
                pairs.push(raw);
                pairs.push(derived);
            } else {
                pairs.push(MetadataPair::new(key.as_str(), header.value_or_absent(key)));
            }
        }

        ResultList::filtered(pairs)
    }
}
