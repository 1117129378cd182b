//! Loading a JSON seed into a fresh store.
//!
//! The seed uses the external field names plus explicit parent ids:
//!
//! ```json
//! {
//!   "categories":    [{"id": 1, "name_en": "Morning"}],
//!   "subcategories": [{"id": 10, "category_id": 1, "name_en": "Waking"}],
//!   "duas":          [{"id": 100, "subcategory_id": 10, "name_en": "Upon Waking"}]
//! }
//! ```
//!
//! Counts (`subcategory_count`, `dua_count`) are derived from the rows when
//! the seed leaves them out.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rusqlite::params;
use serde::{Deserialize, Serialize};
use tracing::info;

use dua_model::{CategoryId, Dua, SubcategoryId};

use crate::{ContentStore, Result, StoreError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub categories: Vec<SeedCategory>,
    pub subcategories: Vec<SeedSubcategory>,
    pub duas: Vec<SeedDua>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCategory {
    pub id: CategoryId,
    pub name_en: String,
    #[serde(default)]
    pub name_bn: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub subcategory_count: Option<u32>,
    #[serde(default)]
    pub dua_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSubcategory {
    pub id: SubcategoryId,
    pub category_id: CategoryId,
    pub name_en: String,
    #[serde(default)]
    pub name_bn: Option<String>,
    #[serde(default)]
    pub dua_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedDua {
    pub subcategory_id: SubcategoryId,
    #[serde(flatten)]
    pub dua: Dua,
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| StoreError::SeedFormat { source })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::SeedIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Check uniqueness of ids and that every parent reference resolves.
    pub fn validate(&self) -> Result<()> {
        let mut categories = BTreeSet::new();
        for category in &self.categories {
            if !categories.insert(category.id) {
                return Err(StoreError::InvalidSeed(format!(
                    "duplicate category id {}",
                    category.id
                )));
            }
        }
        let mut subcategories = BTreeSet::new();
        for subcategory in &self.subcategories {
            if !subcategories.insert(subcategory.id) {
                return Err(StoreError::InvalidSeed(format!(
                    "duplicate subcategory id {}",
                    subcategory.id
                )));
            }
            if !categories.contains(&subcategory.category_id) {
                return Err(StoreError::InvalidSeed(format!(
                    "subcategory {} references unknown category {}",
                    subcategory.id, subcategory.category_id
                )));
            }
        }
        let mut duas = BTreeSet::new();
        for seed in &self.duas {
            if !duas.insert(seed.dua.id) {
                return Err(StoreError::InvalidSeed(format!(
                    "duplicate dua id {}",
                    seed.dua.id
                )));
            }
            if !subcategories.contains(&seed.subcategory_id) {
                return Err(StoreError::InvalidSeed(format!(
                    "dua {} references unknown subcategory {}",
                    seed.dua.id, seed.subcategory_id
                )));
            }
        }
        Ok(())
    }

    fn derived_counts(&self) -> DerivedCounts {
        let mut counts = DerivedCounts::default();
        let parent_of: BTreeMap<SubcategoryId, CategoryId> = self
            .subcategories
            .iter()
            .map(|sub| (sub.id, sub.category_id))
            .collect();
        for sub in &self.subcategories {
            *counts.subcategories_per_category.entry(sub.category_id).or_default() += 1;
        }
        for seed in &self.duas {
            *counts.duas_per_subcategory.entry(seed.subcategory_id).or_default() += 1;
            if let Some(category) = parent_of.get(&seed.subcategory_id) {
                *counts.duas_per_category.entry(*category).or_default() += 1;
            }
        }
        counts
    }
}

#[derive(Default)]
struct DerivedCounts {
    subcategories_per_category: BTreeMap<CategoryId, u32>,
    duas_per_category: BTreeMap<CategoryId, u32>,
    duas_per_subcategory: BTreeMap<SubcategoryId, u32>,
}

impl ContentStore {
    /// Insert all seed rows in one transaction.
    pub fn import(&self, seed: &SeedData) -> Result<()> {
        seed.validate()?;
        let counts = seed.derived_counts();
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for category in &seed.categories {
            let subcategory_count = category.subcategory_count.unwrap_or_else(|| {
                counts
                    .subcategories_per_category
                    .get(&category.id)
                    .copied()
                    .unwrap_or(0)
            });
            let dua_count = category.dua_count.unwrap_or_else(|| {
                counts.duas_per_category.get(&category.id).copied().unwrap_or(0)
            });
            tx.execute(
                r#"
                INSERT INTO category(cat_id, cat_name_en, cat_name_bn, no_of_subcat, no_of_dua, cat_icon)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    category.id.get(),
                    category.name_en,
                    category.name_bn,
                    subcategory_count,
                    dua_count,
                    category.icon
                ],
            )?;
        }
        for sub in &seed.subcategories {
            let dua_count = sub.dua_count.unwrap_or_else(|| {
                counts.duas_per_subcategory.get(&sub.id).copied().unwrap_or(0)
            });
            tx.execute(
                r#"
                INSERT INTO sub_category(subcat_id, cat_id, subcat_name_en, subcat_name_bn, no_of_dua)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    sub.id.get(),
                    sub.category_id.get(),
                    sub.name_en,
                    sub.name_bn,
                    dua_count
                ],
            )?;
        }
        for seed_dua in &seed.duas {
            let dua = &seed_dua.dua;
            tx.execute(
                r#"
                INSERT INTO dua(
                  dua_id, subcat_id, dua_name_en, dua_name_bn, dua_arabic, clean_arabic,
                  transliteration_en, transliteration_bn, translation_en, translation_bn,
                  refference_en, refference_bn, audio
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                params![
                    dua.id.get(),
                    seed_dua.subcategory_id.get(),
                    dua.name_en,
                    dua.name_bn,
                    dua.arabic_text,
                    dua.clean_arabic_text,
                    dua.transliteration_en,
                    dua.transliteration_bn,
                    dua.translation_en,
                    dua.translation_bn,
                    dua.reference_en,
                    dua.reference_bn,
                    dua.audio_url
                ],
            )?;
        }
        tx.commit()?;
        info!(
            categories = seed.categories.len(),
            subcategories = seed.subcategories.len(),
            duas = seed.duas.len(),
            "Seed imported"
        );
        Ok(())
    }
}
