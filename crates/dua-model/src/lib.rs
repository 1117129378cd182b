//! Entity types shared by the dua store, the HTTP service and the client.
//!
//! The corpus is a fixed three-level hierarchy:
//!
//! - [`Category`]: top-level topic (e.g. "Morning")
//! - [`Subcategory`]: grouping inside one category
//! - [`Dua`]: a single supplication record inside one subcategory
//!
//! Field names on these types are the *external* contract served over
//! HTTP. Storage column names live in `dua-store` and are mapped onto
//! these names through [`DuaField`].

pub mod entity;
pub mod error;
pub mod field;
pub mod ids;
pub mod search;

pub use entity::{Category, Dua, FieldValue, PartialDua, ProjectedDua, Subcategory};
pub use error::{ModelError, Result};
pub use field::{DuaField, FieldSelection};
pub use ids::{CategoryId, DuaId, SubcategoryId};
pub use search::{Searchable, matches_name};
