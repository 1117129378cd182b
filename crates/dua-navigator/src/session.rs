//! Async driver that executes navigator commands.
//!
//! Every command becomes one tokio task that yields at most one
//! [`Message`]. Completions are applied in the order they finish, so a
//! slow response can arrive after a newer one; the navigator's tickets
//! decide whether it still applies.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use dua_client::DuaSource;

use crate::message::{Command, Message};
use crate::navigator::Navigator;

/// Delay between the last keystroke and the search request.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct Session<S> {
    navigator: Navigator,
    source: Arc<S>,
    debounce: Duration,
    tasks: JoinSet<Option<Message>>,
    search_timer: Option<CancellationToken>,
}

impl<S: DuaSource> Session<S> {
    pub fn new(source: S) -> Self {
        Self::with_debounce(source, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(source: S, debounce: Duration) -> Self {
        Self {
            navigator: Navigator::new(),
            source: Arc::new(source),
            debounce,
            tasks: JoinSet::new(),
            search_timer: None,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Number of commands whose completion has not been applied yet.
    pub fn outstanding(&self) -> usize {
        self.tasks.len()
    }

    /// Apply a message and start the commands it produces.
    pub fn dispatch(&mut self, message: Message) {
        for command in self.navigator.update(message) {
            self.execute(command);
        }
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `false` when nothing is outstanding.
    pub async fn next(&mut self) -> bool {
        match self.tasks.join_next().await {
            Some(Ok(Some(message))) => {
                self.dispatch(message);
                true
            }
            Some(Ok(None)) => true,
            Some(Err(err)) => {
                warn!(error = %err, "Navigator task did not complete");
                true
            }
            None => false,
        }
    }

    /// Apply completions until no command is outstanding.
    ///
    /// Completions may start new commands (a fired search timer starts a
    /// search), which are awaited as well.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    fn execute(&mut self, command: Command) {
        debug!(?command, "Executing");
        match command {
            Command::FetchCategories { ticket } => {
                let source = Arc::clone(&self.source);
                self.spawn(async move {
                    let result = source.categories().await;
                    Some(Message::CategoriesLoaded { ticket, result })
                });
            }
            Command::FetchSubcategories { category, ticket } => {
                let source = Arc::clone(&self.source);
                self.spawn(async move {
                    let result = source.subcategories(category).await;
                    Some(Message::SubcategoriesLoaded {
                        category,
                        ticket,
                        result,
                    })
                });
            }
            Command::FetchDuas {
                subcategory,
                ticket,
            } => {
                let source = Arc::clone(&self.source);
                self.spawn(async move {
                    let result = source.duas(subcategory).await;
                    Some(Message::DuasLoaded {
                        subcategory,
                        ticket,
                        result,
                    })
                });
            }
            Command::Search { query, ticket } => {
                let source = Arc::clone(&self.source);
                self.spawn(async move {
                    let result = source.search(&query).await;
                    Some(Message::SearchCompleted {
                        ticket,
                        query,
                        result,
                    })
                });
            }
            Command::ScheduleSearch { seq } => {
                self.cancel_search_timer();
                let token = CancellationToken::new();
                let cancelled = token.clone();
                let deadline = Instant::now() + self.debounce;
                self.search_timer = Some(token);
                self.spawn(async move {
                    tokio::select! {
                        () = cancelled.cancelled() => None,
                        () = sleep_until(deadline) => Some(Message::SearchDue { seq }),
                    }
                });
            }
            Command::CancelSearchTimer => self.cancel_search_timer(),
        }
    }

    fn cancel_search_timer(&mut self) {
        if let Some(token) = self.search_timer.take() {
            token.cancel();
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Option<Message>> + Send + 'static,
    {
        self.tasks.spawn(task);
    }
}
