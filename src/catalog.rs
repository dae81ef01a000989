//! # Catalog Module
//!
//! Static dish catalog loaded once at startup. Entries are grouped by category
//! and can be sampled either one at a time or in batches without replacement.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::errors::{CatalogError, EmptyCatalogError};

/// Payload value meaning "draw from the whole catalog". Reserved: no catalog
/// category may use it.
pub const ALL_CATEGORIES: &str = "__all__";

/// A single dish record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishEntry {
    pub name: String,
    pub category: String,
}

/// Where a batch of dishes is drawn from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pool {
    All,
    Category(String),
}

impl Pool {
    /// Decode a category selector, mapping the sentinel to [`Pool::All`]
    pub fn from_selector(selector: &str) -> Self {
        if selector == ALL_CATEGORIES {
            Pool::All
        } else {
            Pool::Category(selector.to_string())
        }
    }

    /// Encode for use inside a button payload
    pub fn selector(&self) -> &str {
        match self {
            Pool::All => ALL_CATEGORIES,
            Pool::Category(name) => name,
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// The full dish catalog, indexed by category
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<DishEntry>,
    by_category: BTreeMap<String, Vec<usize>>,
}

impl Catalog {
    /// Build a catalog from records, validating each one
    pub fn new(entries: Vec<DishEntry>) -> Result<Self, CatalogError> {
        let mut by_category: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for (index, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(CatalogError::InvalidRecord {
                    index,
                    field: "name",
                });
            }
            if entry.category.trim().is_empty() {
                return Err(CatalogError::InvalidRecord {
                    index,
                    field: "category",
                });
            }
            if entry.category == ALL_CATEGORIES {
                return Err(CatalogError::ReservedCategory {
                    index,
                    name: entry.category.clone(),
                });
            }
            by_category
                .entry(entry.category.clone())
                .or_default()
                .push(index);
        }

        Ok(Self {
            entries,
            by_category,
        })
    }

    /// Parse a JSON array of `{ "name", "category" }` records
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let entries: Vec<DishEntry> = serde_json::from_str(content)?;
        Self::new(entries)
    }

    /// Load the catalog file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            dishes = catalog.len(),
            categories = catalog.by_category.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DishEntry] {
        &self.entries
    }

    /// Distinct category names, sorted lexicographically
    pub fn categories(&self) -> Vec<&str> {
        self.by_category.keys().map(String::as_str).collect()
    }

    /// Entries belonging to `category`, in file order
    pub fn in_category(&self, category: &str) -> Vec<&DishEntry> {
        self.by_category
            .get(category)
            .map(|indices| indices.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// Uniform pick from the whole catalog
    pub fn sample_random<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<&DishEntry, EmptyCatalogError> {
        if self.entries.is_empty() {
            return Err(EmptyCatalogError);
        }
        Ok(&self.entries[rng.gen_range(0..self.entries.len())])
    }

    /// Draw up to `n` distinct entries from `pool` in random order.
    ///
    /// A pool smaller than `n` is returned whole (shuffled); an unknown or
    /// empty category yields an empty vector.
    pub fn sample_many<R: Rng + ?Sized>(
        &self,
        pool: &Pool,
        n: usize,
        rng: &mut R,
    ) -> Vec<&DishEntry> {
        let indices: Vec<usize> = match pool {
            Pool::All => (0..self.entries.len()).collect(),
            Pool::Category(name) => match self.by_category.get(name) {
                Some(indices) => indices.clone(),
                None => return Vec::new(),
            },
        };

        let amount = n.min(indices.len());
        if amount == 0 {
            return Vec::new();
        }

        index::sample(rng, indices.len(), amount)
            .into_iter()
            .map(|i| &self.entries[indices[i]])
            .collect()
    }
}
