//! Inputs to and effects requested by the [`Navigator`](crate::Navigator).

use dua_client::FetchError;
use dua_model::{Category, CategoryId, Dua, Subcategory, SubcategoryId};

use crate::load::Ticket;

/// Everything that can change navigator state.
#[derive(Debug, Clone)]
pub enum Message {
    // =========================================================================
    // User actions
    // =========================================================================
    /// Load the category list (retries after a failure).
    Start,

    /// Drop all state and invalidate every in-flight request.
    Reset,

    /// Expand or collapse a category.
    ToggleCategory(CategoryId),

    /// Expand or collapse a subcategory; expanding closes the previous one.
    ToggleSubcategory(SubcategoryId),

    /// Show a dua in the detail pane.
    SelectDua(Dua),

    /// The search box changed.
    SearchInput(String),

    // =========================================================================
    // Timer
    // =========================================================================
    /// The debounce timer scheduled with sequence `seq` fired.
    SearchDue { seq: u64 },

    // =========================================================================
    // Fetch completions
    // =========================================================================
    CategoriesLoaded {
        ticket: Ticket,
        result: Result<Vec<Category>, FetchError>,
    },

    SubcategoriesLoaded {
        category: CategoryId,
        ticket: Ticket,
        result: Result<Vec<Subcategory>, FetchError>,
    },

    DuasLoaded {
        subcategory: SubcategoryId,
        ticket: Ticket,
        result: Result<Vec<Dua>, FetchError>,
    },

    SearchCompleted {
        ticket: Ticket,
        query: String,
        result: Result<Vec<Dua>, FetchError>,
    },
}

/// Side effects the navigator asks its driver to perform.
///
/// Each fetch command produces exactly one matching completion message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchCategories {
        ticket: Ticket,
    },
    FetchSubcategories {
        category: CategoryId,
        ticket: Ticket,
    },
    FetchDuas {
        subcategory: SubcategoryId,
        ticket: Ticket,
    },
    /// Replace the pending debounce timer with one that reports `seq`.
    ScheduleSearch {
        seq: u64,
    },
    /// Drop the pending debounce timer, if any.
    CancelSearchTimer,
    Search {
        query: String,
        ticket: Ticket,
    },
}
