//! Storage schema.
//!
//! Column names are the legacy names of the published dataset
//! (`refference_*`, `no_of_*`, ...). Nothing outside this crate sees them;
//! queries project them onto the external names with `AS`.

pub(crate) const SQL: &str = r#"
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS category (
          cat_id INTEGER PRIMARY KEY,
          cat_name_en TEXT NOT NULL,
          cat_name_bn TEXT,
          no_of_subcat INTEGER NOT NULL DEFAULT 0,
          no_of_dua INTEGER NOT NULL DEFAULT 0,
          cat_icon TEXT
        );

        CREATE TABLE IF NOT EXISTS sub_category (
          subcat_id INTEGER PRIMARY KEY,
          cat_id INTEGER NOT NULL REFERENCES category(cat_id),
          subcat_name_en TEXT NOT NULL,
          subcat_name_bn TEXT,
          no_of_dua INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS dua (
          dua_id INTEGER PRIMARY KEY,
          subcat_id INTEGER NOT NULL REFERENCES sub_category(subcat_id),
          dua_name_en TEXT,
          dua_name_bn TEXT,
          dua_arabic TEXT,
          clean_arabic TEXT,
          transliteration_en TEXT,
          transliteration_bn TEXT,
          translation_en TEXT,
          translation_bn TEXT,
          refference_en TEXT,
          refference_bn TEXT,
          audio TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_sub_category_cat ON sub_category(cat_id);
        CREATE INDEX IF NOT EXISTS idx_dua_subcat ON dua(subcat_id);
"#;
