//! Per-node load state.

use std::fmt;

use dua_client::FetchError;

/// Identifies one dispatched fetch.
///
/// Tickets are issued from a counter that only grows, so a completion can be
/// matched against the request the node is currently waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic ticket source.
#[derive(Debug, Default, Clone)]
pub(crate) struct TicketCounter(u64);

impl TicketCounter {
    pub(crate) fn issue(&mut self) -> Ticket {
        self.0 += 1;
        Ticket(self.0)
    }
}

/// Lifecycle of a lazily fetched list.
///
/// `NotRequested -> Loading -> Loaded | Failed`; a `Failed` node goes back
/// to `Loading` when it is expanded again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    NotRequested,
    Loading {
        ticket: Ticket,
    },
    Loaded(T),
    Failed(FetchError),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::NotRequested
    }
}

impl<T> LoadState<T> {
    /// Whether expanding this node should dispatch a fetch.
    pub fn needs_fetch(&self) -> bool {
        matches!(self, Self::NotRequested | Self::Failed(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Whether a completion carrying `ticket` may be applied.
    pub fn awaits(&self, ticket: Ticket) -> bool {
        matches!(self, Self::Loading { ticket: pending } if *pending == ticket)
    }

    pub(crate) fn settle(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(err) => Self::Failed(err),
        }
    }
}
