//! View models derived from navigator state.
//!
//! These are plain snapshots: building one never mutates the navigator,
//! and each implements `Display` as an indented text tree.

use std::fmt;

use dua_model::{CategoryId, Dua, DuaId, SubcategoryId};

use crate::load::LoadState;
use crate::navigator::{Mode, Navigator, ResultOrigin};

pub const NO_ITEMS: &str = "No items";
const UNNAMED: &str = "(untitled)";

/// The list area: exactly one of the browse tree and the search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Browse(TreeView),
    Search(SearchView),
}

/// Contents of one node, or why there are none to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children<T> {
    Loading,
    Failed(String),
    Empty,
    Items(Vec<T>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeView {
    pub categories: Children<CategoryNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    pub subcategory_count: u32,
    pub dua_count: u32,
    /// `None` while collapsed.
    pub children: Option<Children<SubcategoryNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcategoryNode {
    pub id: SubcategoryId,
    pub name: String,
    pub dua_count: u32,
    /// `None` while collapsed.
    pub children: Option<Children<DuaNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuaNode {
    pub id: DuaId,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub query: String,
    /// A request is in flight for the current query.
    pub pending: bool,
    pub origin: Option<ResultOrigin>,
    pub results: Children<DuaNode>,
}

impl Navigator {
    /// Snapshot of whatever the list area currently shows.
    pub fn screen(&self) -> Screen {
        match self.mode() {
            Mode::Browsing => Screen::Browse(self.tree()),
            Mode::Searching => Screen::Search(self.search_view()),
        }
    }

    pub fn tree(&self) -> TreeView {
        let categories = children_of(self.categories(), |category| {
            let expanded = self.is_category_expanded(category.id);
            CategoryNode {
                id: category.id,
                name: category.name_en.clone(),
                subcategory_count: category.subcategory_count,
                dua_count: category.dua_count,
                children: expanded.then(|| self.subcategory_children(category.id)),
            }
        });
        TreeView { categories }
    }

    pub fn search_view(&self) -> SearchView {
        let results: Vec<DuaNode> = self.results().iter().map(|d| self.dua_node(d)).collect();
        SearchView {
            query: self.query().trim().to_string(),
            pending: self.is_search_pending(),
            origin: self.result_origin(),
            results: if results.is_empty() {
                Children::Empty
            } else {
                Children::Items(results)
            },
        }
    }

    fn subcategory_children(&self, category: CategoryId) -> Children<SubcategoryNode> {
        let Some(state) = self.subcategories(category) else {
            return Children::Loading;
        };
        children_of(state, |sub| {
            let expanded = self.expanded_subcategory() == Some(sub.id);
            SubcategoryNode {
                id: sub.id,
                name: sub.name_en.clone(),
                dua_count: sub.dua_count,
                children: expanded.then(|| match self.duas(sub.id) {
                    Some(state) => children_of(state, |dua| self.dua_node(dua)),
                    None => Children::Loading,
                }),
            }
        })
    }

    fn dua_node(&self, dua: &Dua) -> DuaNode {
        DuaNode {
            id: dua.id,
            name: dua
                .name_en
                .as_deref()
                .filter(|name| !name.is_empty())
                .unwrap_or(UNNAMED)
                .to_string(),
            selected: self.selected().is_some_and(|selected| selected.id == dua.id),
        }
    }
}

fn children_of<T, N>(state: &LoadState<Vec<T>>, node: impl Fn(&T) -> N) -> Children<N> {
    match state {
        LoadState::NotRequested | LoadState::Loading { .. } => Children::Loading,
        LoadState::Failed(err) => Children::Failed(err.user_message().to_string()),
        LoadState::Loaded(items) if items.is_empty() => Children::Empty,
        LoadState::Loaded(items) => Children::Items(items.iter().map(node).collect()),
    }
}

// =============================================================================
// Text rendering
// =============================================================================

fn write_status<T>(
    f: &mut fmt::Formatter<'_>,
    depth: usize,
    children: &Children<T>,
) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match children {
        Children::Loading => writeln!(f, "{indent}Loading..."),
        Children::Failed(message) => writeln!(f, "{indent}Error: {message}"),
        Children::Empty => writeln!(f, "{indent}{NO_ITEMS}"),
        Children::Items(_) => Ok(()),
    }
}

fn marker<T>(children: Option<&T>) -> char {
    if children.is_some() { '▾' } else { '▸' }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Browse(tree) => write!(f, "{tree}"),
            Self::Search(search) => write!(f, "{search}"),
        }
    }
}

impl fmt::Display for DuaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer = if self.selected { '>' } else { ' ' };
        write!(f, "{pointer} [{}] {}", self.id, self.name)
    }
}

impl fmt::Display for TreeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_status(f, 0, &self.categories)?;
        let Children::Items(categories) = &self.categories else {
            return Ok(());
        };
        for category in categories {
            writeln!(
                f,
                "{} [{}] {} ({} subcategories, {} duas)",
                marker(category.children.as_ref()),
                category.id,
                category.name,
                category.subcategory_count,
                category.dua_count
            )?;
            let Some(subs) = &category.children else {
                continue;
            };
            write_status(f, 1, subs)?;
            let Children::Items(subs) = subs else {
                continue;
            };
            for sub in subs {
                writeln!(
                    f,
                    "  {} [{}] {} ({} duas)",
                    marker(sub.children.as_ref()),
                    sub.id,
                    sub.name,
                    sub.dua_count
                )?;
                let Some(duas) = &sub.children else {
                    continue;
                };
                write_status(f, 2, duas)?;
                if let Children::Items(duas) = duas {
                    for dua in duas {
                        writeln!(f, "    {dua}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for SearchView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Search: {:?}", self.query)?;
        if self.pending {
            write!(f, " (searching...)")?;
        }
        if self.origin == Some(ResultOrigin::LocalScan) {
            write!(f, " (offline matches)")?;
        }
        writeln!(f)?;
        match &self.results {
            Children::Items(results) => {
                for dua in results {
                    writeln!(f, "{dua}")?;
                }
                Ok(())
            }
            other => write_status(f, 1, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use dua_client::FetchError;
    use dua_model::{Category, Subcategory};

    use super::*;
    use crate::message::{Command, Message};

    fn category(id: i64, name: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name_en: name.to_string(),
            name_bn: None,
            subcategory_count: 0,
            dua_count: 0,
            icon: None,
        }
    }

    fn only_ticket(commands: &[Command]) -> crate::Ticket {
        match commands {
            [
                Command::FetchCategories { ticket }
                | Command::FetchSubcategories { ticket, .. }
                | Command::FetchDuas { ticket, .. },
            ] => *ticket,
            other => panic!("unexpected commands {other:?}"),
        }
    }

    fn loaded_navigator() -> Navigator {
        let mut nav = Navigator::new();
        let ticket = only_ticket(&nav.update(Message::Start));
        nav.update(Message::CategoriesLoaded {
            ticket,
            result: Ok(vec![category(1, "Morning"), category(4, "Travel")]),
        });
        nav
    }

    #[test]
    fn collapsed_tree_shows_only_categories() {
        let nav = loaded_navigator();
        let tree = nav.tree();
        let Children::Items(categories) = &tree.categories else {
            panic!("categories should be loaded");
        };
        assert_eq!(categories.len(), 2);
        assert!(categories.iter().all(|c| c.children.is_none()));
        assert!(tree.to_string().starts_with("▸ [1] Morning"));
    }

    #[test]
    fn childless_category_shows_no_items() {
        let mut nav = loaded_navigator();
        let travel = CategoryId::new(4);
        let ticket = only_ticket(&nav.update(Message::ToggleCategory(travel)));
        assert!(nav.tree().to_string().contains("Loading..."));

        nav.update(Message::SubcategoriesLoaded {
            category: travel,
            ticket,
            result: Ok(Vec::new()),
        });
        let tree = nav.tree();
        let Children::Items(categories) = &tree.categories else {
            panic!("categories should be loaded");
        };
        assert_eq!(categories[1].children, Some(Children::Empty));
        assert!(tree.to_string().contains(NO_ITEMS));
    }

    #[test]
    fn failed_node_shows_user_message() {
        let mut nav = loaded_navigator();
        let morning = CategoryId::new(1);
        let ticket = only_ticket(&nav.update(Message::ToggleCategory(morning)));
        nav.update(Message::SubcategoriesLoaded {
            category: morning,
            ticket,
            result: Err(FetchError::Timeout),
        });
        let text = nav.tree().to_string();
        assert!(text.contains(FetchError::Timeout.user_message()));
    }

    #[test]
    fn expanded_subcategory_marks_selection() {
        let mut nav = loaded_navigator();
        let morning = CategoryId::new(1);
        let ticket = only_ticket(&nav.update(Message::ToggleCategory(morning)));
        nav.update(Message::SubcategoriesLoaded {
            category: morning,
            ticket,
            result: Ok(vec![Subcategory {
                id: SubcategoryId::new(10),
                name_en: "Waking".to_string(),
                name_bn: None,
                dua_count: 1,
            }]),
        });
        let waking = SubcategoryId::new(10);
        let ticket = only_ticket(&nav.update(Message::ToggleSubcategory(waking)));
        let upon_waking = Dua::named(DuaId::new(100), "Upon Waking");
        nav.update(Message::DuasLoaded {
            subcategory: waking,
            ticket,
            result: Ok(vec![upon_waking.clone()]),
        });
        nav.update(Message::SelectDua(upon_waking));

        let text = nav.tree().to_string();
        assert!(text.contains("▾ [1] Morning"));
        assert!(text.contains("  ▾ [10] Waking (1 duas)"));
        assert!(text.contains("    > [100] Upon Waking"));
    }

    #[test]
    fn screen_follows_mode() {
        let mut nav = loaded_navigator();
        assert!(matches!(nav.screen(), Screen::Browse(_)));

        let commands = nav.update(Message::SearchInput("zzz".to_string()));
        let [Command::ScheduleSearch { seq }] = commands.as_slice() else {
            panic!("expected a scheduled search");
        };
        nav.update(Message::SearchDue { seq: *seq });

        let Screen::Search(view) = nav.screen() else {
            panic!("expected the search screen");
        };
        assert!(view.pending);
        assert_eq!(view.results, Children::Empty);
        assert!(view.to_string().contains(NO_ITEMS));
    }
}
