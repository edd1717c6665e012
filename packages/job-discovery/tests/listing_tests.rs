//! Listing controller behavior against the mock catalog.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use job_discovery::testing::{job, MockJobCatalog, NavEffect, RecordingNavigator};
use job_discovery::{
    Application, ApplicationReceipt, BoardConfig, CategoryAction, CategoryBoard, CategoryQuery,
    CategoryResponse, FilterAction, Job, JobBoard, JobCatalog, JobId, JobType, Lead, LeadAck,
    ListingView, RefreshOutcome, Route, SearchQuery, SearchResponse, SortBy,
};

fn config() -> BoardConfig {
    BoardConfig {
        page_size: 20,
        search_debounce: Duration::from_millis(500),
        ..BoardConfig::default()
    }
}

fn board(catalog: &Arc<MockJobCatalog>, navigator: &Arc<RecordingNavigator>, url: &str) -> JobBoard {
    JobBoard::from_url(url, catalog.clone(), navigator.clone(), &config())
}

fn numbered_jobs(count: usize) -> Vec<Job> {
    (1..=count).map(|i| job(&i.to_string()).build()).collect()
}

fn ids(jobs: &[Job]) -> Vec<&str> {
    jobs.iter().map(|j| j.id.as_str()).collect()
}

#[tokio::test]
async fn initial_state_comes_from_the_url() {
    let catalog = Arc::new(MockJobCatalog::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "?q=icu&category=nurses&job_type=part-time&page=2");

    let query = board.query();
    assert_eq!(query.search_term, "icu");
    assert_eq!(query.category.as_deref(), Some("nurses"));
    assert_eq!(query.job_type, Some(JobType::PartTime));
    assert_eq!(query.page, 2);
    assert_eq!(board.snapshot().view, ListingView::Unavailable);
}

#[tokio::test(start_paused = true)]
async fn typing_burst_issues_one_query() {
    let catalog = Arc::new(MockJobCatalog::new().with_jobs(vec![
        job("1").title("ICU Nurse").build(),
        job("2").title("Pharmacist").build(),
    ]));
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "");

    for term in ["n", "nu", "nur", "nurse"] {
        assert_eq!(
            board
                .dispatch(FilterAction::SetSearchTerm(term.to_string()))
                .await,
            None
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(board.has_pending_search());
    assert!(catalog.search_calls().is_empty());

    tokio::time::sleep(Duration::from_millis(600)).await;

    let calls = catalog.search_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].q.as_deref(), Some("nurse"));
    assert_eq!(navigator.current_query().as_deref(), Some("q=nurse"));
    assert_eq!(ids(&board.snapshot().jobs), ["1"]);
}

#[tokio::test(start_paused = true)]
async fn pause_between_bursts_issues_two_queries() {
    let catalog = Arc::new(MockJobCatalog::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "");

    board
        .dispatch(FilterAction::SetSearchTerm("icu".to_string()))
        .await;
    tokio::time::sleep(Duration::from_millis(600)).await;
    board
        .dispatch(FilterAction::SetSearchTerm("icu nurse".to_string()))
        .await;
    tokio::time::sleep(Duration::from_millis(600)).await;

    let terms: Vec<_> = catalog.search_calls().into_iter().map(|q| q.q).collect();
    assert_eq!(
        terms,
        vec![Some("icu".to_string()), Some("icu nurse".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn submitting_the_search_skips_the_quiet_period() {
    let catalog = Arc::new(MockJobCatalog::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "");

    board
        .dispatch(FilterAction::SetSearchTerm("icu".to_string()))
        .await;
    let outcome = board
        .dispatch(FilterAction::SubmitSearch("icu".to_string()))
        .await;

    assert_eq!(outcome, Some(RefreshOutcome::Applied));
    assert!(!board.has_pending_search());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(catalog.search_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn stale_response_is_discarded() {
    let catalog = Arc::new(
        MockJobCatalog::new()
            .with_jobs(vec![
                job("1").title("Slow ward nurse").build(),
                job("2").title("Fast track nurse").build(),
            ])
            .with_search_delay("slow", Duration::from_secs(2)),
    );
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "");

    let first = board.clone();
    let slow = tokio::spawn(async move {
        first
            .dispatch(FilterAction::SubmitSearch("slow".to_string()))
            .await
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let fast = board
        .dispatch(FilterAction::SubmitSearch("fast".to_string()))
        .await;
    assert_eq!(fast, Some(RefreshOutcome::Applied));

    assert_eq!(slow.await.unwrap(), Some(RefreshOutcome::Stale));

    let snapshot = board.snapshot();
    assert_eq!(ids(&snapshot.jobs), ["2"]);
    assert_eq!(snapshot.query.search_term, "fast");
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn failed_requery_keeps_previous_results() {
    let catalog = Arc::new(MockJobCatalog::new().with_jobs(numbered_jobs(2)));
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "");

    assert_eq!(board.refresh().await, RefreshOutcome::Applied);

    catalog.set_search_outage(Some((503, "Service unavailable")));
    let outcome = board
        .dispatch(FilterAction::SetJobType(Some(JobType::Contract)))
        .await;
    assert_eq!(outcome, Some(RefreshOutcome::Failed));

    let snapshot = board.snapshot();
    assert_eq!(snapshot.view, ListingView::Results);
    assert_eq!(snapshot.jobs.len(), 2);
    assert_eq!(
        navigator.errors(),
        vec!["Couldn't load jobs: Service unavailable".to_string()]
    );
    assert!(navigator.routes().is_empty());
}

#[tokio::test]
async fn first_load_failure_shows_unavailable() {
    let catalog = Arc::new(MockJobCatalog::new());
    catalog.set_search_outage(Some((500, "Internal Server Error")));
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "");

    assert_eq!(board.refresh().await, RefreshOutcome::Failed);
    assert_eq!(board.snapshot().view, ListingView::Unavailable);

    catalog.set_search_outage(None);
    assert_eq!(board.refresh().await, RefreshOutcome::Applied);
    assert_eq!(
        board.snapshot().view,
        ListingView::Empty { can_reset: false }
    );
}

#[tokio::test]
async fn no_matches_offers_reset() {
    let catalog = Arc::new(MockJobCatalog::new().with_jobs(numbered_jobs(3)));
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "");

    board
        .dispatch(FilterAction::SubmitSearch("radiographer".to_string()))
        .await;
    assert_eq!(
        board.snapshot().view,
        ListingView::Empty { can_reset: true }
    );

    let outcome = board.clear_filters().await;
    assert_eq!(outcome, Some(RefreshOutcome::Applied));
    assert_eq!(navigator.current_query().as_deref(), Some(""));

    let snapshot = board.snapshot();
    assert_eq!(snapshot.view, ListingView::Results);
    assert_eq!(snapshot.total, 3);
}

#[tokio::test]
async fn paging_moves_within_range_only() {
    let catalog = Arc::new(MockJobCatalog::new().with_jobs(numbered_jobs(45)));
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "");
    board.refresh().await;

    let snapshot = board.snapshot();
    assert_eq!(snapshot.total_pages, 3);
    assert_eq!(snapshot.page_window, vec![1, 2, 3]);
    assert!(!snapshot.controls.has_previous);
    assert!(snapshot.controls.has_next);

    assert_eq!(board.go_to_page(5).await, None);
    assert_eq!(board.go_to_page(1).await, None);
    assert_eq!(board.previous_page().await, None);
    assert_eq!(catalog.search_calls().len(), 1);

    assert_eq!(board.next_page().await, Some(RefreshOutcome::Applied));
    let snapshot = board.snapshot();
    assert_eq!(snapshot.query.page, 2);
    assert_eq!(snapshot.jobs.len(), 20);
    assert_eq!(snapshot.jobs[0].id.as_str(), "21");
    assert!(snapshot.controls.has_previous);
    assert!(snapshot.controls.has_next);
    assert_eq!(navigator.current_query().as_deref(), Some("page=2"));
    assert_eq!(navigator.scrolls(), 1);

    let last = catalog.search_calls().pop().unwrap();
    assert_eq!(last.page.offset, 20);
    assert_eq!(last.page.limit, 20);

    board.go_to_page(3).await;
    assert_eq!(board.snapshot().jobs.len(), 5);
    assert!(!board.snapshot().controls.has_next);
}

#[tokio::test]
async fn page_action_outside_range_is_ignored() {
    let catalog = Arc::new(MockJobCatalog::new().with_jobs(numbered_jobs(45)));
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "");
    board.refresh().await;

    assert_eq!(board.dispatch(FilterAction::SetPage(9)).await, None);
    assert_eq!(board.dispatch(FilterAction::SetPage(0)).await, None);
    assert_eq!(board.query().page, 1);
    assert_eq!(catalog.search_calls().len(), 1);
    assert_eq!(navigator.current_query(), None);
    assert_eq!(navigator.scrolls(), 0);

    assert_eq!(
        board.dispatch(FilterAction::SetPage(3)).await,
        Some(RefreshOutcome::Applied)
    );
    assert_eq!(board.snapshot().jobs.len(), 5);
}

#[tokio::test]
async fn filter_change_resets_to_first_page() {
    let catalog = Arc::new(MockJobCatalog::new().with_jobs(numbered_jobs(45)));
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "page=3");
    board.refresh().await;

    board
        .dispatch(FilterAction::SetSortBy(SortBy::Oldest))
        .await;

    assert_eq!(board.query().page, 1);
    assert_eq!(
        navigator.current_query().as_deref(),
        Some("sort_by=oldest")
    );
    assert_eq!(navigator.scrolls(), 1);
    assert_eq!(
        catalog.search_calls().pop().unwrap().sort_by,
        Some(SortBy::Oldest)
    );
}

#[tokio::test]
async fn results_are_sorted_with_archived_last() {
    let catalog = Arc::new(MockJobCatalog::new().with_jobs(vec![
        job("old").created("2024-01-01T00:00:00Z").build(),
        job("archived").archived().created("2024-06-01T00:00:00Z").build(),
        job("new").created("2024-03-01T00:00:00Z").build(),
    ]));
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "");

    board.refresh().await;
    assert_eq!(ids(&board.snapshot().jobs), ["new", "old", "archived"]);

    board
        .dispatch(FilterAction::SetSortBy(SortBy::Oldest))
        .await;
    assert_eq!(ids(&board.snapshot().jobs), ["old", "new", "archived"]);
}

#[tokio::test]
async fn unchanged_filter_does_not_requery() {
    let catalog = Arc::new(MockJobCatalog::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let board = board(&catalog, &navigator, "category=nurses");

    let outcome = board
        .dispatch(FilterAction::SetCategory(Some("nurses".to_string())))
        .await;

    assert_eq!(outcome, None);
    assert!(catalog.search_calls().is_empty());
    assert!(navigator.effects().is_empty());
}

/// Catalog that leaks rows the public listing must never show.
struct LeakyCatalog;

#[async_trait]
impl JobCatalog for LeakyCatalog {
    async fn search_jobs(&self, _query: &SearchQuery) -> job_discovery::Result<SearchResponse> {
        Ok(SearchResponse {
            jobs: vec![
                job("ok").build(),
                job("gone").deleted().build(),
                job("pending").unapproved().build(),
            ],
            total: 3,
            total_pages: 1,
        })
    }

    async fn category_jobs(
        &self,
        _query: &CategoryQuery,
    ) -> job_discovery::Result<CategoryResponse> {
        unimplemented!()
    }

    async fn job_details(&self, _id: &JobId) -> job_discovery::Result<Job> {
        unimplemented!()
    }

    async fn apply(
        &self,
        _id: &JobId,
        _application: &Application,
        _token: &str,
    ) -> job_discovery::Result<ApplicationReceipt> {
        unimplemented!()
    }

    async fn submit_lead(&self, _id: &JobId, _lead: &Lead) -> job_discovery::Result<LeadAck> {
        unimplemented!()
    }
}

#[tokio::test]
async fn hidden_jobs_are_never_listed() {
    let navigator = Arc::new(RecordingNavigator::new());
    let board = JobBoard::from_url("", Arc::new(LeakyCatalog), navigator, &config());

    board.refresh().await;
    assert_eq!(ids(&board.snapshot().jobs), ["ok"]);
}

// ============================================================================
// Category pages
// ============================================================================

fn category_catalog() -> MockJobCatalog {
    MockJobCatalog::new()
        .with_category("nurses", "Nurses")
        .with_jobs(vec![
            job("1").category("nurses").location("Pune").build(),
            job("2").category("nurses").location("Mumbai").build(),
            job("3")
                .category("nurses")
                .location("Pune")
                .job_type(JobType::PartTime)
                .build(),
            job("4").category("doctors").location("Pune").build(),
        ])
        .with_required_experience("3", 5)
}

#[tokio::test]
async fn category_page_loads_metadata_and_jobs() {
    let catalog = Arc::new(category_catalog());
    let navigator = Arc::new(RecordingNavigator::new());
    let board = CategoryBoard::from_url(
        "/nurses/",
        "location=pune",
        catalog.clone(),
        navigator.clone(),
        &config(),
    );

    assert_eq!(board.refresh().await, RefreshOutcome::Applied);
    let snapshot = board.snapshot();
    assert_eq!(snapshot.meta.as_ref().map(|m| m.name.as_str()), Some("Nurses"));
    assert_eq!(snapshot.total, 2);
    assert_eq!(ids(&snapshot.jobs), ["1", "3"]);

    board
        .dispatch(CategoryAction::SetJobType(Some(JobType::PartTime)))
        .await;
    assert_eq!(ids(&board.snapshot().jobs), ["3"]);
    assert_eq!(
        navigator.current_query().as_deref(),
        Some("location=pune&job_type=part_time")
    );

    board
        .dispatch(CategoryAction::SetMaxExperience(Some(2)))
        .await;
    assert!(board.snapshot().jobs.is_empty());
    board
        .dispatch(CategoryAction::SetMaxExperience(Some(5)))
        .await;
    assert_eq!(ids(&board.snapshot().jobs), ["3"]);
    assert_eq!(
        navigator.current_query().as_deref(),
        Some("location=pune&job_type=part_time&experience=5")
    );

    board.clear_filters().await;
    assert_eq!(board.query().category, "nurses");
    assert_eq!(board.snapshot().total, 3);
}

#[tokio::test]
async fn unknown_category_returns_to_listing() {
    let catalog = Arc::new(category_catalog());
    let navigator = Arc::new(RecordingNavigator::new());
    let board = CategoryBoard::from_url("surgeons", "", catalog, navigator.clone(), &config());

    assert_eq!(board.refresh().await, RefreshOutcome::Failed);
    assert_eq!(navigator.routes(), vec![Route::Listing]);
    assert!(matches!(
        navigator.effects().first(),
        Some(NavEffect::Notify(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn category_location_is_debounced() {
    let catalog = Arc::new(category_catalog());
    let navigator = Arc::new(RecordingNavigator::new());
    let board = CategoryBoard::from_url("nurses", "", catalog.clone(), navigator, &config());

    for location in ["m", "mu", "mum"] {
        board
            .dispatch(CategoryAction::SetLocation(location.to_string()))
            .await;
    }
    tokio::time::sleep(Duration::from_millis(600)).await;

    let calls: Vec<_> = catalog
        .calls()
        .into_iter()
        .filter(|c| matches!(c, job_discovery::testing::CatalogCall::CategoryJobs(_)))
        .collect();
    assert_eq!(calls.len(), 1);
    assert_eq!(ids(&board.snapshot().jobs), ["2"]);
}
