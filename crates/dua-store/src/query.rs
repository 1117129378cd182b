//! The read operations served over HTTP.
//!
//! Every statement is parameterized. Listings are ordered by id; search
//! returns at most [`SEARCH_LIMIT`] rows in id order.

use rusqlite::{Row, params};
use tracing::debug;

use dua_model::{
    Category, CategoryId, Dua, DuaField, DuaId, FieldSelection, FieldValue, PartialDua,
    ProjectedDua, Subcategory, SubcategoryId,
};

use crate::{ContentStore, Result, StoreError};

/// Maximum number of rows returned by [`ContentStore::search_duas`].
pub const SEARCH_LIMIT: usize = 20;

const CATEGORY_SQL: &str = r#"
    SELECT
      cat_id AS id,
      cat_name_en AS name_en,
      cat_name_bn AS name_bn,
      no_of_subcat AS subcategory_count,
      no_of_dua AS dua_count,
      cat_icon AS icon
    FROM category
    ORDER BY cat_id
"#;

const SUBCATEGORY_SQL: &str = r#"
    SELECT
      subcat_id AS id,
      subcat_name_en AS name_en,
      subcat_name_bn AS name_bn,
      no_of_dua AS dua_count
    FROM sub_category
    WHERE cat_id = ?1
    ORDER BY subcat_id
"#;

const SEARCH_SQL: &str = r#"
    SELECT
      dua_id AS id,
      dua_name_en AS name_en,
      dua_name_bn AS name_bn,
      dua_arabic AS arabic_text
    FROM dua
    WHERE
      dua_name_en LIKE ?1 ESCAPE '\' OR
      dua_name_bn LIKE ?1 ESCAPE '\' OR
      dua_arabic LIKE ?1 ESCAPE '\' OR
      translation_en LIKE ?1 ESCAPE '\' OR
      translation_bn LIKE ?1 ESCAPE '\'
    ORDER BY dua_id
    LIMIT ?2
"#;

impl ContentStore {
    /// All categories, ascending by id.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(CATEGORY_SQL)?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: CategoryId::new(row.get(0)?),
                name_en: row.get(1)?,
                name_bn: row.get(2)?,
                subcategory_count: row.get(3)?,
                dua_count: row.get(4)?,
                icon: row.get(5)?,
            })
        })?;
        let categories = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    /// Subcategories of one category. Unknown ids yield an empty list.
    pub fn list_subcategories(&self, category: CategoryId) -> Result<Vec<Subcategory>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(SUBCATEGORY_SQL)?;
        let rows = stmt.query_map(params![category.get()], |row| {
            Ok(Subcategory {
                id: SubcategoryId::new(row.get(0)?),
                name_en: row.get(1)?,
                name_bn: row.get(2)?,
                dua_count: row.get(3)?,
            })
        })?;
        let subcategories = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(%category, count = subcategories.len(), "Listed subcategories");
        Ok(subcategories)
    }

    /// Full duas of one subcategory. Unknown ids yield an empty list.
    pub fn list_duas(&self, subcategory: SubcategoryId) -> Result<Vec<Dua>> {
        let sql = projection_sql(DuaField::all());
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![subcategory.get()], dua_from_row)?;
        let duas = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(%subcategory, count = duas.len(), "Listed duas");
        Ok(duas)
    }

    /// Duas of one subcategory restricted to the selected fields.
    pub fn list_dua_fields(
        &self,
        subcategory: SubcategoryId,
        selection: &FieldSelection,
    ) -> Result<Vec<ProjectedDua>> {
        let fields = selection.fields();
        let sql = projection_sql(fields);
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![subcategory.get()], |row| {
            let mut projected = ProjectedDua::new();
            for (index, field) in fields.iter().copied().enumerate() {
                let value = if field.is_integer() {
                    FieldValue::Integer(row.get(index)?)
                } else {
                    FieldValue::Text(row.get(index)?)
                };
                projected.push(field, value);
            }
            Ok(projected)
        })?;
        let duas = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(
            %subcategory,
            fields = fields.len(),
            count = duas.len(),
            "Listed projected duas"
        );
        Ok(duas)
    }

    /// Case-insensitive substring search over names, arabic text and
    /// translations.
    ///
    /// Case folding is SQLite's `LIKE`, which only folds ASCII letters:
    /// `evening` finds `Evening` but `évening` does not find `Évening`.
    ///
    /// The term is trimmed and matched literally (`%` and `_` carry no
    /// wildcard meaning). Fails with [`StoreError::InvalidArgument`] when the
    /// term is blank.
    pub fn search_duas(&self, term: &str) -> Result<Vec<PartialDua>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(StoreError::InvalidArgument(
                "Search term is required".to_string(),
            ));
        }
        let pattern = format!("%{}%", escape_like(term));
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(SEARCH_SQL)?;
        let rows = stmt.query_map(params![pattern, SEARCH_LIMIT as i64], |row| {
            Ok(PartialDua {
                id: DuaId::new(row.get(0)?),
                name_en: row.get(1)?,
                name_bn: row.get(2)?,
                arabic_text: row.get(3)?,
            })
        })?;
        let hits = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(hits = hits.len(), "Searched duas");
        Ok(hits)
    }
}

/// `SELECT <column> AS <name>, ... FROM dua WHERE subcat_id = ?1`.
fn projection_sql(fields: &[DuaField]) -> String {
    let columns = fields
        .iter()
        .map(|field| format!("{} AS {}", field.storage_column(), field.external_name()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {columns} FROM dua WHERE subcat_id = ?1 ORDER BY dua_id")
}

/// Row layout must match `projection_sql(DuaField::all())`.
fn dua_from_row(row: &Row<'_>) -> rusqlite::Result<Dua> {
    Ok(Dua {
        id: DuaId::new(row.get(0)?),
        name_en: row.get(1)?,
        name_bn: row.get(2)?,
        arabic_text: row.get(3)?,
        clean_arabic_text: row.get(4)?,
        transliteration_en: row.get(5)?,
        transliteration_bn: row.get(6)?,
        translation_en: row.get(7)?,
        translation_bn: row.get(8)?,
        reference_en: row.get(9)?,
        reference_bn: row.get(10)?,
        audio_url: row.get(11)?,
    })
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
