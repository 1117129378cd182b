//! Navigation state machine for the dua browser.
//!
//! The [`Navigator`] owns browse and search state and is driven by
//! [`Message`]s. It answers each message with [`Command`]s, which the async
//! [`Session`] turns into fetches and timers against a
//! [`DuaSource`](dua_client::DuaSource).
//!
//! Guarantees:
//!
//! - each category and subcategory is fetched at most once per session
//!   unless its last fetch failed
//! - at most one subcategory is expanded at a time
//! - a completion is applied only if its node still waits for that ticket
//! - search requests start 300 ms after the last keystroke, and a failed
//!   search falls back to scanning already loaded duas by name
//!
//! Views ([`Screen`], [`TreeView`], [`SearchView`]) and [`render_detail`]
//! are pure functions of the state.

pub mod detail;
pub mod fallback;
pub mod load;
pub mod message;
pub mod navigator;
pub mod session;
pub mod view;

pub use detail::{DetailView, DuaDetail, render_detail};
pub use load::{LoadState, Ticket};
pub use message::{Command, Message};
pub use navigator::{Mode, Navigator, ResultOrigin};
pub use session::{SEARCH_DEBOUNCE, Session};
pub use view::{
    CategoryNode, Children, DuaNode, NO_ITEMS, Screen, SearchView, SubcategoryNode, TreeView,
};
