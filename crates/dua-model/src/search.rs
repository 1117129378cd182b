//! The minimal shape a record needs to take part in a client-side scan.

use crate::entity::Dua;
use crate::ids::DuaId;

/// Capability required by the offline name scan: an id and an English name.
///
/// Records that cannot provide a name are skipped by the scan rather than
/// treated as errors.
pub trait Searchable {
    fn search_id(&self) -> DuaId;
    fn search_name(&self) -> Option<&str>;
}

impl Searchable for Dua {
    fn search_id(&self) -> DuaId {
        self.id
    }

    fn search_name(&self) -> Option<&str> {
        self.name_en.as_deref().filter(|name| !name.is_empty())
    }
}

/// Case-insensitive substring test used by the offline scan.
pub fn matches_name(name: &str, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    name.to_lowercase().contains(&needle)
}
