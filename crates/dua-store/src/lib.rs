//! SQLite content store for the dua corpus.
//!
//! The dataset is three related tables (`category`, `sub_category`,
//! `dua`) that the service only ever reads. This crate owns:
//!
//! - the schema and its legacy column names ([`schema`])
//! - the four read operations used by the HTTP service ([`query`])
//! - loading a JSON seed into a fresh database ([`seed`])
//! - a table/column/row-count summary for operators ([`inspect`])
//!
//! # Example
//!
//! ```no_run
//! use dua_store::ContentStore;
//!
//! # fn main() -> dua_store::Result<()> {
//! let store = ContentStore::open("dua_main.sqlite")?;
//! for category in store.list_categories()? {
//!     println!("{} {}", category.id, category.name_en);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

pub mod error;
pub mod inspect;
pub mod query;
mod schema;
pub mod seed;

pub use error::{Result, StoreError};
pub use inspect::{ColumnInfo, TableSummary};
pub use query::SEARCH_LIMIT;
pub use seed::{SeedCategory, SeedData, SeedDua, SeedSubcategory};

/// Handle to the dua database.
///
/// The connection is guarded by a mutex so one store can be shared by
/// concurrent request handlers; every operation is a short read.
#[derive(Debug)]
pub struct ContentStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl ContentStore {
    /// Open an existing database read-only.
    ///
    /// The connection is probed with `SELECT 1` so a missing or corrupt
    /// file is reported here rather than on the first request.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        info!(path = %path.display(), "Content store opened");
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path),
        })
    }

    /// Create (or reopen) a writable database and ensure the schema exists.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.execute_batch(schema::SQL)?;
        debug!(path = %path.display(), "Content store schema ensured");
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path),
        })
    }

    /// An empty in-memory database with the schema applied.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Location of the database file, if it is not in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}
