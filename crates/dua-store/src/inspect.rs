//! Table summary for operators.

use serde::Serialize;

use crate::{ContentStore, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub row_count: u64,
}

impl ContentStore {
    /// Every user table with its columns and row count, sorted by name.
    pub fn inspect(&self) -> Result<Vec<TableSummary>> {
        let conn = self.lock()?;
        let names = {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
                 ORDER BY name",
            )?;
            stmt.query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let quoted = quote_identifier(&name);
            let columns = {
                let mut stmt = conn.prepare(&format!("PRAGMA table_info({quoted})"))?;
                stmt.query_map([], |row| {
                    Ok(ColumnInfo {
                        name: row.get("name")?,
                        declared_type: row.get("type")?,
                        not_null: row.get::<_, i64>("notnull")? != 0,
                        primary_key: row.get::<_, i64>("pk")? != 0,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?
            };
            let row_count: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {quoted}"), [], |row| {
                    row.get(0)
                })?;
            tables.push(TableSummary {
                name,
                columns,
                row_count: u64::try_from(row_count).unwrap_or(0),
            });
        }
        Ok(tables)
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
