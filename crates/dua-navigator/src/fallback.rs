//! Offline name scan used when the search request fails.

use std::collections::HashSet;

use dua_model::{Searchable, matches_name};

/// Records whose English name contains `query`, ignoring case.
///
/// Records without a name never match. Input order is kept and a record id
/// seen twice is returned once.
pub fn scan<'a, T, I>(records: I, query: &str) -> Vec<&'a T>
where
    T: Searchable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            record
                .search_name()
                .is_some_and(|name| matches_name(name, query))
        })
        .filter(|record| seen.insert(record.search_id()))
        .collect()
}
