//! Session tests with an in-process source and a paused clock.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dua_client::{DuaSource, FetchError, Result};
use dua_model::{Category, CategoryId, Dua, DuaId, Subcategory, SubcategoryId};
use dua_navigator::{LoadState, Message, Mode, ResultOrigin, SEARCH_DEBOUNCE, Session};

#[derive(Clone, Default)]
struct FakeSource {
    calls: Arc<Mutex<Vec<String>>>,
    fail_search: bool,
    slow_query: Option<(&'static str, Duration)>,
    slow_subcategory: Option<(SubcategoryId, Duration)>,
}

impl FakeSource {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

impl DuaSource for FakeSource {
    fn categories(&self) -> impl Future<Output = Result<Vec<Category>>> + Send {
        self.record("categories".to_string());
        async move {
            Ok(vec![Category {
                id: CategoryId::new(1),
                name_en: "Morning".to_string(),
                name_bn: None,
                subcategory_count: 1,
                dua_count: 2,
                icon: None,
            }])
        }
    }

    fn subcategories(
        &self,
        category: CategoryId,
    ) -> impl Future<Output = Result<Vec<Subcategory>>> + Send {
        self.record(format!("subcategories:{category}"));
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(vec![Subcategory {
                id: SubcategoryId::new(10),
                name_en: "Waking".to_string(),
                name_bn: None,
                dua_count: 2,
            }])
        }
    }

    fn duas(&self, subcategory: SubcategoryId) -> impl Future<Output = Result<Vec<Dua>>> + Send {
        self.record(format!("duas:{subcategory}"));
        let delay = match self.slow_subcategory {
            Some((slow, delay)) if slow == subcategory => delay,
            _ => Duration::ZERO,
        };
        async move {
            tokio::time::sleep(delay).await;
            if subcategory == SubcategoryId::new(10) {
                Ok(vec![
                    Dua::named(DuaId::new(100), "Upon Waking"),
                    Dua::named(DuaId::new(101), "Wiping Sleep from the Face"),
                ])
            } else {
                Ok(vec![Dua::named(
                    DuaId::new(subcategory.get() * 10),
                    format!("Dua of {subcategory}"),
                )])
            }
        }
    }

    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Dua>>> + Send {
        self.record(format!("search:{query}"));
        let fail = self.fail_search;
        let delay = match self.slow_query {
            Some((slow, delay)) if slow == query => delay,
            _ => Duration::ZERO,
        };
        let name = query.to_string();
        async move {
            tokio::time::sleep(delay).await;
            if fail {
                Err(FetchError::NetworkUnreachable("connection refused".to_string()))
            } else {
                Ok(vec![Dua::named(DuaId::new(1), name)])
            }
        }
    }
}

fn result_names<S: DuaSource>(session: &Session<S>) -> Vec<String> {
    session
        .navigator()
        .results()
        .iter()
        .filter_map(|d| d.name_en.clone())
        .collect()
}

// =============================================================================
// Debounce
// =============================================================================

#[tokio::test(start_paused = true)]
async fn keystrokes_within_window_send_one_search() {
    let source = FakeSource::default();
    let mut session = Session::new(source.clone());

    session.dispatch(Message::SearchInput("d".to_string()));
    tokio::time::advance(Duration::from_millis(50)).await;
    session.dispatch(Message::SearchInput("du".to_string()));
    tokio::time::advance(Duration::from_millis(50)).await;
    session.dispatch(Message::SearchInput("dua".to_string()));
    session.settle().await;

    assert_eq!(source.calls(), vec!["search:dua".to_string()]);
    assert_eq!(session.navigator().mode(), Mode::Searching);
    assert_eq!(result_names(&session), vec!["dua".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn search_waits_for_full_debounce() {
    let source = FakeSource::default();
    let mut session = Session::new(source.clone());

    session.dispatch(Message::SearchInput("dua".to_string()));
    tokio::time::advance(SEARCH_DEBOUNCE - Duration::from_millis(1)).await;
    tokio::task::yield_now().await;

    assert!(source.calls().is_empty());
    assert_eq!(session.outstanding(), 1);
    assert_eq!(session.navigator().mode(), Mode::Browsing);

    session.settle().await;
    assert_eq!(source.count("search:"), 1);
}

#[tokio::test(start_paused = true)]
async fn clearing_the_box_cancels_the_pending_search() {
    let source = FakeSource::default();
    let mut session = Session::new(source.clone());

    session.dispatch(Message::SearchInput("dua".to_string()));
    tokio::time::advance(Duration::from_millis(100)).await;
    session.dispatch(Message::SearchInput("  ".to_string()));
    session.settle().await;

    assert!(source.calls().is_empty());
    assert_eq!(session.navigator().mode(), Mode::Browsing);
    assert_eq!(session.outstanding(), 0);
}

// =============================================================================
// Fetching
// =============================================================================

#[tokio::test(start_paused = true)]
async fn repeated_expansion_fetches_once() {
    let source = FakeSource::default();
    let mut session = Session::new(source.clone());
    let morning = CategoryId::new(1);

    session.dispatch(Message::Start);
    session.dispatch(Message::ToggleCategory(morning));
    session.dispatch(Message::ToggleCategory(morning));
    session.dispatch(Message::ToggleCategory(morning));
    session.settle().await;

    assert_eq!(source.count("subcategories:"), 1);
    assert!(session.navigator().is_category_expanded(morning));
    assert!(matches!(
        session.navigator().subcategories(morning),
        Some(LoadState::Loaded(subs)) if subs.len() == 1
    ));

    // collapse and reopen from cache
    session.dispatch(Message::ToggleCategory(morning));
    session.dispatch(Message::ToggleCategory(morning));
    session.settle().await;
    assert_eq!(source.count("subcategories:"), 1);
}

fn dua_ids(session: &Session<FakeSource>, subcategory: SubcategoryId) -> Option<Vec<i64>> {
    match session.navigator().duas(subcategory) {
        Some(LoadState::Loaded(duas)) => Some(duas.iter().map(|d| d.id.get()).collect()),
        _ => None,
    }
}

#[tokio::test(start_paused = true)]
async fn late_duas_for_collapsed_subcategory_leave_the_open_one_alone() {
    let waking = SubcategoryId::new(10);
    let evening = SubcategoryId::new(20);
    let source = FakeSource {
        slow_subcategory: Some((waking, Duration::from_secs(1))),
        ..FakeSource::default()
    };
    let mut session = Session::new(source.clone());

    session.dispatch(Message::ToggleSubcategory(waking));
    session.dispatch(Message::ToggleSubcategory(waking));
    session.dispatch(Message::ToggleSubcategory(evening));

    // the fast fetch lands first
    assert!(session.next().await);
    assert_eq!(session.navigator().expanded_subcategory(), Some(evening));
    assert_eq!(dua_ids(&session, evening), Some(vec![200]));
    assert!(session.navigator().duas(waking).is_some_and(LoadState::is_loading));

    session.settle().await;
    assert_eq!(session.navigator().expanded_subcategory(), Some(evening));
    assert_eq!(dua_ids(&session, evening), Some(vec![200]));
    assert_eq!(dua_ids(&session, waking), Some(vec![100, 101]));
    assert_eq!(source.count("duas:"), 2);
}

#[tokio::test(start_paused = true)]
async fn reopening_a_loading_subcategory_fetches_once() {
    let waking = SubcategoryId::new(10);
    let evening = SubcategoryId::new(20);
    let source = FakeSource {
        slow_subcategory: Some((waking, Duration::from_secs(1))),
        ..FakeSource::default()
    };
    let mut session = Session::new(source.clone());

    session.dispatch(Message::ToggleSubcategory(waking));
    session.dispatch(Message::ToggleSubcategory(evening));
    session.dispatch(Message::ToggleSubcategory(waking));
    session.settle().await;

    assert_eq!(source.count("duas:10"), 1);
    assert_eq!(source.count("duas:20"), 1);
    assert_eq!(session.navigator().expanded_subcategory(), Some(waking));
    assert_eq!(dua_ids(&session, waking), Some(vec![100, 101]));
}

#[tokio::test(start_paused = true)]
async fn reset_discards_in_flight_results() {
    let source = FakeSource::default();
    let mut session = Session::new(source.clone());
    let morning = CategoryId::new(1);

    session.dispatch(Message::ToggleCategory(morning));
    session.dispatch(Message::Reset);
    session.settle().await;

    assert!(session.navigator().subcategories(morning).is_none());
    assert!(!session.navigator().is_category_expanded(morning));
}

// =============================================================================
// Search results
// =============================================================================

#[tokio::test(start_paused = true)]
async fn failed_search_scans_loaded_duas() {
    let source = FakeSource {
        fail_search: true,
        ..FakeSource::default()
    };
    let mut session = Session::new(source.clone());

    session.dispatch(Message::ToggleSubcategory(SubcategoryId::new(10)));
    session.settle().await;
    session.dispatch(Message::SearchInput("WAKING".to_string()));
    session.settle().await;

    assert_eq!(source.count("search:"), 1);
    assert_eq!(
        session.navigator().result_origin(),
        Some(ResultOrigin::LocalScan)
    );
    assert_eq!(result_names(&session), vec!["Upon Waking".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn late_result_for_old_query_is_dropped() {
    let source = FakeSource {
        slow_query: Some(("ayat", Duration::from_secs(1))),
        ..FakeSource::default()
    };
    let mut session = Session::new(source.clone());

    session.dispatch(Message::SearchInput("ayat".to_string()));
    tokio::time::advance(SEARCH_DEBOUNCE).await;
    // apply the timer; the slow search for "ayat" is now in flight
    assert!(session.next().await);
    assert!(session.navigator().is_search_pending());

    session.dispatch(Message::SearchInput("ayatul".to_string()));
    session.settle().await;

    assert_eq!(
        source.calls(),
        vec!["search:ayat".to_string(), "search:ayatul".to_string()]
    );
    assert_eq!(result_names(&session), vec!["ayatul".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn selection_from_search_needs_no_cache() {
    let source = FakeSource::default();
    let mut session = Session::new(source.clone());

    session.dispatch(Message::SearchInput("kursi".to_string()));
    session.settle().await;

    let hit = session.navigator().results()[0].clone();
    session.dispatch(Message::SelectDua(hit));
    let detail = dua_navigator::render_detail(session.navigator().selected());
    assert!(detail.to_string().contains("1. kursi"));
    assert!(detail.to_string().contains("Translation not available"));
}
