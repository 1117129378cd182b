//! Projectable dua fields.
//!
//! Each [`DuaField`] couples the external (HTTP) name of an attribute with
//! the storage column it is read from. This is the single place where the
//! renamed projection is defined; the store builds its `SELECT` lists
//! from it and the service validates `fields=` selectors against it.

use std::fmt;
use std::str::FromStr;

use crate::{ModelError, Result};

/// A dua attribute that can be requested through a field selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DuaField {
    Id,
    NameEn,
    NameBn,
    ArabicText,
    CleanArabicText,
    TransliterationEn,
    TransliterationBn,
    TranslationEn,
    TranslationBn,
    ReferenceEn,
    ReferenceBn,
    AudioUrl,
}

impl DuaField {
    /// All fields in the order of the full dua shape.
    pub const fn all() -> &'static [DuaField] {
        &[
            Self::Id,
            Self::NameEn,
            Self::NameBn,
            Self::ArabicText,
            Self::CleanArabicText,
            Self::TransliterationEn,
            Self::TransliterationBn,
            Self::TranslationEn,
            Self::TranslationBn,
            Self::ReferenceEn,
            Self::ReferenceBn,
            Self::AudioUrl,
        ]
    }

    /// Name of the field in JSON responses.
    pub const fn external_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::NameEn => "name_en",
            Self::NameBn => "name_bn",
            Self::ArabicText => "arabic_text",
            Self::CleanArabicText => "clean_arabic_text",
            Self::TransliterationEn => "transliteration_en",
            Self::TransliterationBn => "transliteration_bn",
            Self::TranslationEn => "translation_en",
            Self::TranslationBn => "translation_bn",
            Self::ReferenceEn => "reference_en",
            Self::ReferenceBn => "reference_bn",
            Self::AudioUrl => "audio_url",
        }
    }

    /// Column of the `dua` table holding this field.
    pub const fn storage_column(self) -> &'static str {
        match self {
            Self::Id => "dua_id",
            Self::NameEn => "dua_name_en",
            Self::NameBn => "dua_name_bn",
            Self::ArabicText => "dua_arabic",
            Self::CleanArabicText => "clean_arabic",
            Self::TransliterationEn => "transliteration_en",
            Self::TransliterationBn => "transliteration_bn",
            Self::TranslationEn => "translation_en",
            Self::TranslationBn => "translation_bn",
            Self::ReferenceEn => "refference_en",
            Self::ReferenceBn => "refference_bn",
            Self::AudioUrl => "audio",
        }
    }

    /// Whether the stored value is an integer rather than text.
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Id)
    }
}

impl fmt::Display for DuaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.external_name())
    }
}

impl FromStr for DuaField {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self> {
        let name = value.trim();
        Self::all()
            .iter()
            .copied()
            .find(|field| field.external_name() == name)
            .ok_or_else(|| ModelError::UnknownField(name.to_string()))
    }
}

/// A validated, non-empty, duplicate-free list of fields in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection(Vec<DuaField>);

impl FieldSelection {
    /// Build a selection from field names.
    ///
    /// Unrecognized names are dropped without error. Fails with
    /// [`ModelError::EmptySelection`] when nothing recognizable remains.
    pub fn from_names<'a, I>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut fields = Vec::new();
        for name in names {
            if let Ok(field) = name.parse::<DuaField>()
                && !fields.contains(&field)
            {
                fields.push(field);
            }
        }
        if fields.is_empty() {
            return Err(ModelError::EmptySelection);
        }
        Ok(Self(fields))
    }

    /// Parse a comma separated selector such as `"id,name_en"`.
    pub fn parse(selector: &str) -> Result<Self> {
        Self::from_names(selector.split(','))
    }

    pub fn fields(&self) -> &[DuaField] {
        &self.0
    }

    pub fn contains(&self, field: DuaField) -> bool {
        self.0.contains(&field)
    }
}
