//! The navigation state machine.
//!
//! [`Navigator::update`] is the only mutator. It applies one [`Message`]
//! and returns the [`Command`]s the driver must run; it never blocks and
//! never performs I/O itself.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use dua_client::FetchError;
use dua_model::{Category, CategoryId, Dua, DuaId, Subcategory, SubcategoryId};

use crate::fallback;
use crate::load::{LoadState, Ticket, TicketCounter};
use crate::message::{Command, Message};

/// Which pane the list area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Browsing,
    Searching,
}

/// Where the current search results came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOrigin {
    Server,
    /// The request failed and the cached duas were scanned instead.
    LocalScan,
}

#[derive(Debug, Clone)]
struct PendingSearch {
    ticket: Ticket,
    query: String,
}

/// Browse and search state for one session.
#[derive(Debug, Default)]
pub struct Navigator {
    categories: LoadState<Vec<Category>>,
    subcategories: BTreeMap<CategoryId, LoadState<Vec<Subcategory>>>,
    duas: BTreeMap<SubcategoryId, LoadState<Vec<Dua>>>,
    expanded_categories: BTreeSet<CategoryId>,
    expanded_subcategory: Option<SubcategoryId>,
    selected: Option<Dua>,
    query: String,
    mode: Mode,
    results: Vec<Dua>,
    origin: Option<ResultOrigin>,
    pending_search: Option<PendingSearch>,
    debounce_seq: u64,
    tickets: TicketCounter,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one message and return the side effects it requires.
    pub fn update(&mut self, message: Message) -> Vec<Command> {
        match message {
            Message::Start => self.start(),
            Message::Reset => self.reset(),
            Message::ToggleCategory(category) => self.toggle_category(category),
            Message::ToggleSubcategory(subcategory) => self.toggle_subcategory(subcategory),
            Message::SelectDua(dua) => {
                debug!(dua = %dua.id, "Selected dua");
                self.selected = Some(dua);
                Vec::new()
            }
            Message::SearchInput(text) => self.search_input(text),
            Message::SearchDue { seq } => self.search_due(seq),
            Message::CategoriesLoaded { ticket, result } => {
                if self.categories.awaits(ticket) {
                    log_outcome("categories", &result);
                    self.categories = LoadState::settle(result);
                } else {
                    debug!(%ticket, "Discarding stale categories");
                }
                Vec::new()
            }
            Message::SubcategoriesLoaded {
                category,
                ticket,
                result,
            } => {
                match self.subcategories.get_mut(&category) {
                    Some(state) if state.awaits(ticket) => {
                        log_outcome("subcategories", &result);
                        *state = LoadState::settle(result);
                    }
                    _ => debug!(%category, %ticket, "Discarding stale subcategories"),
                }
                Vec::new()
            }
            Message::DuasLoaded {
                subcategory,
                ticket,
                result,
            } => {
                match self.duas.get_mut(&subcategory) {
                    Some(state) if state.awaits(ticket) => {
                        log_outcome("duas", &result);
                        *state = LoadState::settle(result);
                    }
                    _ => debug!(%subcategory, %ticket, "Discarding stale duas"),
                }
                Vec::new()
            }
            Message::SearchCompleted {
                ticket,
                query,
                result,
            } => self.search_completed(ticket, &query, result),
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn start(&mut self) -> Vec<Command> {
        if !self.categories.needs_fetch() {
            return Vec::new();
        }
        let ticket = self.tickets.issue();
        self.categories = LoadState::Loading { ticket };
        vec![Command::FetchCategories { ticket }]
    }

    fn reset(&mut self) -> Vec<Command> {
        let tickets = std::mem::take(&mut self.tickets);
        let debounce_seq = self.debounce_seq + 1;
        *self = Self {
            tickets,
            debounce_seq,
            ..Self::default()
        };
        info!("Navigator reset");
        vec![Command::CancelSearchTimer]
    }

    fn toggle_category(&mut self, category: CategoryId) -> Vec<Command> {
        if self.expanded_categories.remove(&category) {
            debug!(%category, "Collapsed category");
            return Vec::new();
        }
        self.expanded_categories.insert(category);

        let state = self.subcategories.entry(category).or_default();
        if !state.needs_fetch() {
            return Vec::new();
        }
        let ticket = self.tickets.issue();
        *state = LoadState::Loading { ticket };
        vec![Command::FetchSubcategories { category, ticket }]
    }

    fn toggle_subcategory(&mut self, subcategory: SubcategoryId) -> Vec<Command> {
        if self.expanded_subcategory == Some(subcategory) {
            self.expanded_subcategory = None;
            debug!(%subcategory, "Collapsed subcategory");
            return Vec::new();
        }
        self.expanded_subcategory = Some(subcategory);

        let state = self.duas.entry(subcategory).or_default();
        if !state.needs_fetch() {
            return Vec::new();
        }
        let ticket = self.tickets.issue();
        *state = LoadState::Loading { ticket };
        vec![Command::FetchDuas {
            subcategory,
            ticket,
        }]
    }

    fn search_input(&mut self, text: String) -> Vec<Command> {
        self.query = text;
        self.debounce_seq += 1;

        if self.query.trim().is_empty() {
            self.mode = Mode::Browsing;
            self.results.clear();
            self.origin = None;
            self.pending_search = None;
            return vec![Command::CancelSearchTimer];
        }
        vec![Command::ScheduleSearch {
            seq: self.debounce_seq,
        }]
    }

    fn search_due(&mut self, seq: u64) -> Vec<Command> {
        let query = self.query.trim();
        if seq != self.debounce_seq || query.is_empty() {
            debug!(seq, current = self.debounce_seq, "Ignoring superseded search timer");
            return Vec::new();
        }
        let query = query.to_string();
        let ticket = self.tickets.issue();
        self.mode = Mode::Searching;
        self.pending_search = Some(PendingSearch {
            ticket,
            query: query.clone(),
        });
        debug!(%ticket, %query, "Dispatching search");
        vec![Command::Search { query, ticket }]
    }

    fn search_completed(
        &mut self,
        ticket: Ticket,
        query: &str,
        result: Result<Vec<Dua>, FetchError>,
    ) -> Vec<Command> {
        let awaited = self
            .pending_search
            .as_ref()
            .is_some_and(|pending| pending.ticket == ticket && pending.query == query);
        if !awaited || self.mode != Mode::Searching || query != self.query.trim() {
            debug!(%ticket, query, "Discarding stale search result");
            return Vec::new();
        }
        self.pending_search = None;

        match result {
            Ok(hits) => {
                debug!(query, hits = hits.len(), "Search completed");
                self.results = hits;
                self.origin = Some(ResultOrigin::Server);
            }
            Err(err) => {
                self.results = self.scan_cached(query);
                warn!(
                    query,
                    error = %err,
                    hits = self.results.len(),
                    "Search request failed, scanned cached duas instead"
                );
                self.origin = Some(ResultOrigin::LocalScan);
            }
        }
        Vec::new()
    }

    fn scan_cached(&self, query: &str) -> Vec<Dua> {
        let cached = self
            .duas
            .values()
            .filter_map(LoadState::loaded)
            .flatten();
        fallback::scan(cached, query).into_iter().cloned().collect()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn categories(&self) -> &LoadState<Vec<Category>> {
        &self.categories
    }

    pub fn subcategories(&self, category: CategoryId) -> Option<&LoadState<Vec<Subcategory>>> {
        self.subcategories.get(&category)
    }

    pub fn duas(&self, subcategory: SubcategoryId) -> Option<&LoadState<Vec<Dua>>> {
        self.duas.get(&subcategory)
    }

    pub fn is_category_expanded(&self, category: CategoryId) -> bool {
        self.expanded_categories.contains(&category)
    }

    pub fn expanded_subcategory(&self) -> Option<SubcategoryId> {
        self.expanded_subcategory
    }

    pub fn selected(&self) -> Option<&Dua> {
        self.selected.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Dua] {
        &self.results
    }

    pub fn result_origin(&self) -> Option<ResultOrigin> {
        self.origin
    }

    pub fn is_search_pending(&self) -> bool {
        self.pending_search.is_some()
    }

    /// Looks a dua up in the search results, then in every loaded list.
    pub fn find_dua(&self, id: DuaId) -> Option<&Dua> {
        self.results.iter().find(|dua| dua.id == id).or_else(|| {
            self.duas
                .values()
                .filter_map(LoadState::loaded)
                .flatten()
                .find(|dua| dua.id == id)
        })
    }
}

fn log_outcome<T>(what: &str, result: &Result<Vec<T>, FetchError>) {
    match result {
        Ok(items) => debug!(what, count = items.len(), "Loaded"),
        Err(err) => warn!(what, error = %err, "Load failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(id: i64, name: &str) -> Subcategory {
        Subcategory {
            id: SubcategoryId::new(id),
            name_en: name.to_string(),
            name_bn: None,
            dua_count: 0,
        }
    }

    fn dua(id: i64, name: &str) -> Dua {
        Dua::named(DuaId::new(id), name)
    }

    fn fetch_ticket(commands: &[Command]) -> Ticket {
        match commands {
            [
                Command::FetchCategories { ticket }
                | Command::FetchSubcategories { ticket, .. }
                | Command::FetchDuas { ticket, .. }
                | Command::Search { ticket, .. },
            ] => *ticket,
            other => panic!("expected one fetch command, got {other:?}"),
        }
    }

    fn scheduled_seq(commands: &[Command]) -> u64 {
        match commands {
            [Command::ScheduleSearch { seq }] => *seq,
            other => panic!("expected ScheduleSearch, got {other:?}"),
        }
    }

    /// Types `query`, lets the timer fire and returns the search ticket.
    fn dispatch_search(nav: &mut Navigator, query: &str) -> Ticket {
        let seq = scheduled_seq(&nav.update(Message::SearchInput(query.to_string())));
        fetch_ticket(&nav.update(Message::SearchDue { seq }))
    }

    fn load_duas(nav: &mut Navigator, subcategory: i64, duas: Vec<Dua>) {
        let id = SubcategoryId::new(subcategory);
        let ticket = fetch_ticket(&nav.update(Message::ToggleSubcategory(id)));
        nav.update(Message::DuasLoaded {
            subcategory: id,
            ticket,
            result: Ok(duas),
        });
    }

    // =========================================================================
    // Browsing
    // =========================================================================

    #[test]
    fn start_fetches_categories_once() {
        let mut nav = Navigator::new();
        let first = nav.update(Message::Start);
        assert!(matches!(first.as_slice(), [Command::FetchCategories { .. }]));
        assert!(nav.update(Message::Start).is_empty());
        assert!(nav.categories().is_loading());
    }

    #[test]
    fn failed_categories_retry_on_start() {
        let mut nav = Navigator::new();
        let ticket = fetch_ticket(&nav.update(Message::Start));
        nav.update(Message::CategoriesLoaded {
            ticket,
            result: Err(FetchError::Timeout),
        });
        assert!(matches!(nav.categories(), LoadState::Failed(FetchError::Timeout)));

        let retry = fetch_ticket(&nav.update(Message::Start));
        assert_ne!(retry, ticket);
    }

    #[test]
    fn expanding_while_loading_is_single_flight() {
        let mut nav = Navigator::new();
        let category = CategoryId::new(1);

        let commands = nav.update(Message::ToggleCategory(category));
        assert_eq!(commands.len(), 1);

        // collapse and re-expand before the response arrives
        assert!(nav.update(Message::ToggleCategory(category)).is_empty());
        assert!(nav.update(Message::ToggleCategory(category)).is_empty());
        assert!(nav.subcategories(category).unwrap().is_loading());
    }

    #[test]
    fn loaded_category_toggles_without_refetch() {
        let mut nav = Navigator::new();
        let category = CategoryId::new(1);
        let ticket = fetch_ticket(&nav.update(Message::ToggleCategory(category)));
        nav.update(Message::SubcategoriesLoaded {
            category,
            ticket,
            result: Ok(vec![sub(10, "Waking")]),
        });

        assert!(nav.update(Message::ToggleCategory(category)).is_empty());
        assert!(!nav.is_category_expanded(category));
        assert!(nav.update(Message::ToggleCategory(category)).is_empty());
        assert!(nav.is_category_expanded(category));
        assert_eq!(
            nav.subcategories(category).unwrap().loaded().unwrap().len(),
            1
        );
    }

    #[test]
    fn failed_subcategories_refetch_on_expansion() {
        let mut nav = Navigator::new();
        let category = CategoryId::new(3);
        let ticket = fetch_ticket(&nav.update(Message::ToggleCategory(category)));
        nav.update(Message::SubcategoriesLoaded {
            category,
            ticket,
            result: Err(FetchError::NetworkUnreachable("refused".to_string())),
        });

        nav.update(Message::ToggleCategory(category));
        let commands = nav.update(Message::ToggleCategory(category));
        assert!(matches!(
            commands.as_slice(),
            [Command::FetchSubcategories { .. }]
        ));
    }

    #[test]
    fn subcategories_expand_as_accordion() {
        let mut nav = Navigator::new();
        load_duas(&mut nav, 10, vec![dua(100, "Upon Waking")]);
        assert_eq!(nav.expanded_subcategory(), Some(SubcategoryId::new(10)));

        nav.update(Message::ToggleSubcategory(SubcategoryId::new(11)));
        assert_eq!(nav.expanded_subcategory(), Some(SubcategoryId::new(11)));

        // going back to a loaded one needs no fetch
        let commands = nav.update(Message::ToggleSubcategory(SubcategoryId::new(10)));
        assert!(commands.is_empty());
        assert_eq!(nav.expanded_subcategory(), Some(SubcategoryId::new(10)));

        nav.update(Message::ToggleSubcategory(SubcategoryId::new(10)));
        assert_eq!(nav.expanded_subcategory(), None);
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut nav = Navigator::new();
        let category = CategoryId::new(1);
        let ticket = fetch_ticket(&nav.update(Message::ToggleCategory(category)));
        nav.update(Message::Reset);

        // a fresh request after the reset
        let fresh = fetch_ticket(&nav.update(Message::ToggleCategory(category)));
        assert_ne!(fresh, ticket);

        nav.update(Message::SubcategoriesLoaded {
            category,
            ticket,
            result: Ok(vec![sub(99, "Stale")]),
        });
        assert!(nav.subcategories(category).unwrap().awaits(fresh));

        nav.update(Message::SubcategoriesLoaded {
            category,
            ticket: fresh,
            result: Ok(vec![sub(10, "Waking")]),
        });
        let loaded = nav.subcategories(category).unwrap().loaded().unwrap();
        assert_eq!(loaded[0].name_en, "Waking");
    }

    #[test]
    fn completion_for_unrequested_node_is_ignored() {
        let mut nav = Navigator::new();
        let ticket = fetch_ticket(&nav.update(Message::Start));
        nav.update(Message::DuasLoaded {
            subcategory: SubcategoryId::new(5),
            ticket,
            result: Ok(vec![dua(1, "x")]),
        });
        assert!(nav.duas(SubcategoryId::new(5)).is_none());
    }

    #[test]
    fn selection_survives_mode_changes() {
        let mut nav = Navigator::new();
        nav.update(Message::SelectDua(dua(300, "Ayatul Kursi")));
        dispatch_search(&mut nav, "kursi");
        assert_eq!(nav.mode(), Mode::Searching);
        assert_eq!(nav.selected().unwrap().id, DuaId::new(300));
        nav.update(Message::SearchInput(String::new()));
        assert_eq!(nav.selected().unwrap().id, DuaId::new(300));
    }

    // =========================================================================
    // Searching
    // =========================================================================

    #[test]
    fn typing_restarts_the_timer() {
        let mut nav = Navigator::new();
        let first = scheduled_seq(&nav.update(Message::SearchInput("d".to_string())));
        let second = scheduled_seq(&nav.update(Message::SearchInput("du".to_string())));
        assert!(second > first);

        // the superseded timer fires late
        assert!(nav.update(Message::SearchDue { seq: first }).is_empty());
        assert_eq!(nav.mode(), Mode::Browsing);

        let commands = nav.update(Message::SearchDue { seq: second });
        assert!(matches!(
            commands.as_slice(),
            [Command::Search { query, .. }] if query == "du"
        ));
    }

    #[test]
    fn blank_query_exits_search_immediately() {
        let mut nav = Navigator::new();
        let ticket = dispatch_search(&mut nav, "ayat");
        nav.update(Message::SearchCompleted {
            ticket,
            query: "ayat".to_string(),
            result: Ok(vec![dua(200, "Ayatul Kursi Before Sleep")]),
        });
        assert_eq!(nav.results().len(), 1);

        let commands = nav.update(Message::SearchInput("   ".to_string()));
        assert_eq!(commands, vec![Command::CancelSearchTimer]);
        assert_eq!(nav.mode(), Mode::Browsing);
        assert!(nav.results().is_empty());
    }

    #[test]
    fn success_replaces_results_wholesale() {
        let mut nav = Navigator::new();
        let ticket = dispatch_search(&mut nav, "a");
        nav.update(Message::SearchCompleted {
            ticket,
            query: "a".to_string(),
            result: Ok(vec![dua(1, "a"), dua(2, "ab")]),
        });

        let ticket = dispatch_search(&mut nav, "ab");
        nav.update(Message::SearchCompleted {
            ticket,
            query: "ab".to_string(),
            result: Ok(vec![dua(2, "ab")]),
        });
        let ids: Vec<DuaId> = nav.results().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![DuaId::new(2)]);
        assert_eq!(nav.result_origin(), Some(ResultOrigin::Server));
    }

    #[test]
    fn failure_falls_back_to_cached_names() {
        let mut nav = Navigator::new();
        load_duas(
            &mut nav,
            10,
            vec![dua(100, "Upon Waking"), dua(101, "Wiping Sleep")],
        );
        load_duas(&mut nav, 20, vec![dua(200, "Before Sleep")]);

        let ticket = dispatch_search(&mut nav, "SLEEP");
        nav.update(Message::SearchCompleted {
            ticket,
            query: "SLEEP".to_string(),
            result: Err(FetchError::ServerError {
                status: 500,
                body: String::new(),
            }),
        });

        let ids: Vec<i64> = nav.results().iter().map(|d| d.id.get()).collect();
        assert_eq!(ids, vec![101, 200]);
        assert_eq!(nav.result_origin(), Some(ResultOrigin::LocalScan));
        assert_eq!(nav.mode(), Mode::Searching);
    }

    #[test]
    fn failure_with_empty_cache_yields_no_results() {
        let mut nav = Navigator::new();
        let ticket = dispatch_search(&mut nav, "anything");
        nav.update(Message::SearchCompleted {
            ticket,
            query: "anything".to_string(),
            result: Err(FetchError::Timeout),
        });
        assert!(nav.results().is_empty());
        assert!(!nav.is_search_pending());
    }

    #[test]
    fn result_for_changed_query_is_discarded() {
        let mut nav = Navigator::new();
        let ticket = dispatch_search(&mut nav, "ayat");

        // user keeps typing while the request is in flight
        nav.update(Message::SearchInput("ayatul".to_string()));
        nav.update(Message::SearchCompleted {
            ticket,
            query: "ayat".to_string(),
            result: Ok(vec![dua(201, "Last Verses of Al-Baqarah")]),
        });
        assert!(nav.results().is_empty());
        assert!(nav.is_search_pending());
    }

    #[test]
    fn result_after_leaving_search_is_discarded() {
        let mut nav = Navigator::new();
        let ticket = dispatch_search(&mut nav, "ayat");
        nav.update(Message::SearchInput(String::new()));
        nav.update(Message::SearchCompleted {
            ticket,
            query: "ayat".to_string(),
            result: Ok(vec![dua(201, "Last Verses")]),
        });
        assert_eq!(nav.mode(), Mode::Browsing);
        assert!(nav.results().is_empty());
    }

    #[test]
    fn search_keeps_browse_caches() {
        let mut nav = Navigator::new();
        load_duas(&mut nav, 10, vec![dua(100, "Upon Waking")]);
        dispatch_search(&mut nav, "waking");
        nav.update(Message::SearchInput(String::new()));
        assert!(nav.duas(SubcategoryId::new(10)).unwrap().loaded().is_some());
        assert_eq!(nav.expanded_subcategory(), Some(SubcategoryId::new(10)));
    }

    #[test]
    fn find_dua_checks_results_then_caches() {
        let mut nav = Navigator::new();
        load_duas(&mut nav, 10, vec![dua(100, "Upon Waking")]);
        assert!(nav.find_dua(DuaId::new(100)).is_some());
        assert!(nav.find_dua(DuaId::new(999)).is_none());
    }
}
