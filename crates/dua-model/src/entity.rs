//! Category, subcategory and dua records.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::field::DuaField;
use crate::ids::{CategoryId, DuaId, SubcategoryId};

/// Root of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name_en: String,
    #[serde(default)]
    pub name_bn: Option<String>,
    #[serde(default)]
    pub subcategory_count: u32,
    #[serde(default)]
    pub dua_count: u32,
    #[serde(default)]
    pub icon: Option<String>,
}

/// A grouping of duas inside exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name_en: String,
    #[serde(default)]
    pub name_bn: Option<String>,
    #[serde(default)]
    pub dua_count: u32,
}

/// A supplication record.
///
/// Every attribute except the id may be absent: columns are nullable and a
/// search hit only carries a subset (see [`PartialDua`]). Consumers must
/// not assume any optional field is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dua {
    pub id: DuaId,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub name_bn: Option<String>,
    #[serde(default)]
    pub arabic_text: Option<String>,
    #[serde(default)]
    pub clean_arabic_text: Option<String>,
    #[serde(default)]
    pub transliteration_en: Option<String>,
    #[serde(default)]
    pub transliteration_bn: Option<String>,
    #[serde(default)]
    pub translation_en: Option<String>,
    #[serde(default)]
    pub translation_bn: Option<String>,
    #[serde(default)]
    pub reference_en: Option<String>,
    #[serde(default)]
    pub reference_bn: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
}

impl Dua {
    /// A dua carrying only an id and an English name.
    pub fn named(id: DuaId, name_en: impl Into<String>) -> Self {
        Self {
            id,
            name_en: Some(name_en.into()),
            name_bn: None,
            arabic_text: None,
            clean_arabic_text: None,
            transliteration_en: None,
            transliteration_bn: None,
            translation_en: None,
            translation_bn: None,
            reference_en: None,
            reference_bn: None,
            audio_url: None,
        }
    }
}

impl From<PartialDua> for Dua {
    fn from(partial: PartialDua) -> Self {
        Self {
            name_en: partial.name_en,
            name_bn: partial.name_bn,
            arabic_text: partial.arabic_text,
            ..Self::named(partial.id, String::new())
        }
    }
}

/// The reduced shape returned by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDua {
    pub id: DuaId,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub name_bn: Option<String>,
    #[serde(default)]
    pub arabic_text: Option<String>,
}

/// A value read for one projected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(Option<String>),
}

/// A dua restricted to a caller-chosen set of fields.
///
/// Serializes as a JSON object containing exactly the selected keys, in
/// selection order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectedDua {
    values: Vec<(DuaField, FieldValue)>,
}

impl ProjectedDua {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: DuaField, value: FieldValue) {
        self.values.push((field, value));
    }

    pub fn get(&self, field: DuaField) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = DuaField> + '_ {
        self.values.iter().map(|(field, _)| *field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for ProjectedDua {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in &self.values {
            map.serialize_entry(field.external_name(), value)?;
        }
        map.end()
    }
}
