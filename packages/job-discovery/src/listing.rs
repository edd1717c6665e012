//! Listing controllers: the public job search and the category pages.
//!
//! Both are a [`ListingController`] over a filter value implementing
//! [`ListingQuery`]. The controller owns the flow from a filter change to a
//! rendered page:
//!
//! 1. reduce the action into the next filter value
//! 2. mirror it into the URL query string
//! 3. re-query the catalog, immediately or after the debounce quiet period
//! 4. apply the response only if no newer request was issued meanwhile
//!
//! A failed query keeps the last good result set on screen and surfaces a
//! notification instead.
//!
//! ```rust,ignore
//! let board = JobBoard::from_url("category=nurses&page=2", catalog, navigator, &config);
//! board.refresh().await;
//!
//! board.dispatch(FilterAction::SetSearchTerm("icu".into())).await; // debounced
//! board.go_to_page(3).await;                                       // immediate
//! let snapshot = board.snapshot();
//! ```

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::catalog::JobCatalog;
use crate::category::{CategoryAction, CategoryFilter};
use crate::config::BoardConfig;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::filter::{sort_jobs, FilterAction, FilterState, Requery, SortBy};
use crate::navigator::{Navigator, Notice, Route};
use crate::pagination::{self, PageControls};
use crate::sequence::RequestSequencer;
use crate::types::{CategoryInfo, Job};

// ============================================================================
// Query abstraction
// ============================================================================

/// One normalized page of results.
#[derive(Debug, Clone)]
pub struct ResultPage<M> {
    pub jobs: Vec<Job>,
    /// Size of the full filtered set, not just this page.
    pub total: u64,
    pub total_pages: u32,
    pub meta: M,
}

/// A filter value a [`ListingController`] can drive.
#[async_trait]
pub trait ListingQuery: Clone + PartialEq + Debug + Send + Sync + 'static {
    type Action: Clone + Debug + Send + Sync + 'static;
    /// Extra data returned with each page (category metadata).
    type Meta: Clone + Debug + Send + Sync + 'static;

    fn reduce(&self, action: &Self::Action) -> Self;
    fn requery(action: &Self::Action) -> Requery;
    fn page_action(page: u32) -> Self::Action;
    fn clear_action() -> Self::Action;

    fn page(&self) -> u32;
    fn has_filters(&self) -> bool;
    fn to_query_string(&self) -> String;

    /// Client-side ordering; `None` keeps server order (archived still last).
    fn sort_by(&self) -> Option<SortBy>;

    /// Where to send the visitor when a fetch fails. `None` stays put.
    fn failure_route(&self) -> Option<Route>;

    async fn fetch(
        &self,
        catalog: &dyn JobCatalog,
        page_size: u32,
    ) -> Result<ResultPage<Self::Meta>>;
}

#[async_trait]
impl ListingQuery for FilterState {
    type Action = FilterAction;
    type Meta = ();

    fn reduce(&self, action: &FilterAction) -> Self {
        self.apply(action)
    }

    fn requery(action: &FilterAction) -> Requery {
        action.requery()
    }

    fn page_action(page: u32) -> FilterAction {
        FilterAction::SetPage(page)
    }

    fn clear_action() -> FilterAction {
        FilterAction::Clear
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn has_filters(&self) -> bool {
        FilterState::has_filters(self)
    }

    fn to_query_string(&self) -> String {
        FilterState::to_query_string(self)
    }

    fn sort_by(&self) -> Option<SortBy> {
        Some(self.sort_by)
    }

    fn failure_route(&self) -> Option<Route> {
        None
    }

    async fn fetch(&self, catalog: &dyn JobCatalog, page_size: u32) -> Result<ResultPage<()>> {
        let response = catalog
            .search_jobs(&self.to_search_query(page_size))
            .await?;
        Ok(ResultPage {
            jobs: response.jobs,
            total: response.total,
            total_pages: pagination::total_pages(response.total, page_size),
            meta: (),
        })
    }
}

#[async_trait]
impl ListingQuery for CategoryFilter {
    type Action = CategoryAction;
    type Meta = CategoryInfo;

    fn reduce(&self, action: &CategoryAction) -> Self {
        self.apply(action)
    }

    fn requery(action: &CategoryAction) -> Requery {
        action.requery()
    }

    fn page_action(page: u32) -> CategoryAction {
        CategoryAction::SetPage(page)
    }

    fn clear_action() -> CategoryAction {
        CategoryAction::Clear
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn has_filters(&self) -> bool {
        CategoryFilter::has_filters(self)
    }

    fn to_query_string(&self) -> String {
        CategoryFilter::to_query_string(self)
    }

    fn sort_by(&self) -> Option<SortBy> {
        None
    }

    // The category in the path may not exist
    fn failure_route(&self) -> Option<Route> {
        Some(Route::Listing)
    }

    async fn fetch(
        &self,
        catalog: &dyn JobCatalog,
        page_size: u32,
    ) -> Result<ResultPage<CategoryInfo>> {
        let response = catalog
            .category_jobs(&self.to_category_query(page_size))
            .await?;
        let total = response.category.total_count;
        Ok(ResultPage {
            jobs: response.jobs,
            total,
            total_pages: pagination::total_pages(total, page_size),
            meta: response.category,
        })
    }
}

// ============================================================================
// Snapshot
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingView {
    /// No response has arrived yet.
    Loading,
    /// The first query failed; there is nothing to keep on screen. The
    /// failure was already notified and `refresh` retries.
    Unavailable,
    Results,
    /// The query succeeded with zero matches. `can_reset` offers the
    /// one-click "clear filters" affordance.
    Empty { can_reset: bool },
}

/// Everything a renderer needs for one frame of a listing page.
#[derive(Debug, Clone)]
pub struct ListingSnapshot<Q: ListingQuery> {
    pub query: Q,
    pub jobs: Vec<Job>,
    pub total: u64,
    pub total_pages: u32,
    pub page_window: Vec<u32>,
    pub controls: PageControls,
    pub meta: Option<Q::Meta>,
    /// A request is in flight. The previous results stay visible meanwhile.
    pub loading: bool,
    pub view: ListingView,
}

/// Result of one [`ListingController::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer request was issued while this one was in flight.
    Stale,
    /// Transport or server failure; the previous results were kept.
    Failed,
}

// ============================================================================
// Controller
// ============================================================================

struct ListingState<Q: ListingQuery> {
    query: Q,
    results: Option<ResultPage<Q::Meta>>,
    in_flight: usize,
}

struct ListingInner<Q: ListingQuery> {
    catalog: Arc<dyn JobCatalog>,
    navigator: Arc<dyn Navigator>,
    page_size: u32,
    page_window: u32,
    debouncer: Debouncer,
    sequencer: RequestSequencer,
    state: Mutex<ListingState<Q>>,
}

/// Drives one listing page. Cloning shares the same state.
pub struct ListingController<Q: ListingQuery> {
    inner: Arc<ListingInner<Q>>,
}

impl<Q: ListingQuery> Clone for ListingController<Q> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Public job search listing.
pub type JobBoard = ListingController<FilterState>;

/// Category landing page listing.
pub type CategoryBoard = ListingController<CategoryFilter>;

impl JobBoard {
    /// Listing initialized from the URL query string.
    pub fn from_url(
        query: &str,
        catalog: Arc<dyn JobCatalog>,
        navigator: Arc<dyn Navigator>,
        config: &BoardConfig,
    ) -> Self {
        Self::new(
            FilterState::from_query_string(query),
            catalog,
            navigator,
            config,
        )
    }
}

impl CategoryBoard {
    /// Category page initialized from its path segment and query string.
    pub fn from_url(
        category: &str,
        query: &str,
        catalog: Arc<dyn JobCatalog>,
        navigator: Arc<dyn Navigator>,
        config: &BoardConfig,
    ) -> Self {
        Self::new(
            CategoryFilter::from_url(category, query),
            catalog,
            navigator,
            config,
        )
    }
}

impl<Q: ListingQuery> ListingController<Q> {
    pub fn new(
        query: Q,
        catalog: Arc<dyn JobCatalog>,
        navigator: Arc<dyn Navigator>,
        config: &BoardConfig,
    ) -> Self {
        Self {
            inner: Arc::new(ListingInner {
                catalog,
                navigator,
                page_size: config.page_size.max(1),
                page_window: config.page_window.max(1),
                debouncer: Debouncer::new(config.search_debounce),
                sequencer: RequestSequencer::new(),
                state: Mutex::new(ListingState {
                    query,
                    results: None,
                    in_flight: 0,
                }),
            }),
        }
    }

    pub fn query(&self) -> Q {
        self.lock().query.clone()
    }

    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// Whether a debounced query is waiting for typing to pause.
    pub fn has_pending_search(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// Apply a filter action.
    ///
    /// Returns the refresh outcome for immediate re-queries and `None` when
    /// the query was deferred to the debouncer or nothing changed.
    pub async fn dispatch(&self, action: Q::Action) -> Option<RefreshOutcome> {
        let (previous, next) = {
            let mut state = self.lock();
            let previous = state.query.clone();
            let next = previous.reduce(&action);
            if next.page() != previous.page() {
                if let Some(results) = &state.results {
                    if !pagination::is_navigable(next.page(), results.total_pages) {
                        debug!(
                            page = next.page(),
                            total_pages = results.total_pages,
                            "Page out of range"
                        );
                        return None;
                    }
                }
            }
            state.query = next.clone();
            (previous, next)
        };

        let requery = Q::requery(&action);
        if next == previous {
            // Submitting what the debouncer is already waiting on: run it now
            if requery == Requery::Immediate && self.inner.debouncer.cancel() {
                return Some(self.refresh().await);
            }
            return None;
        }

        debug!(?action, "Filter changed");
        self.inner.navigator.replace_query(&next.to_query_string());
        if next.page() != previous.page() {
            self.inner.navigator.scroll_to_top();
        }

        match requery {
            Requery::Debounced => {
                let this = self.clone();
                self.inner.debouncer.schedule(async move {
                    this.refresh().await;
                });
                None
            }
            Requery::Immediate => {
                self.inner.debouncer.cancel();
                Some(self.refresh().await)
            }
        }
    }

    /// Move to `page`. Pages outside `1..=total_pages` are ignored.
    pub async fn go_to_page(&self, page: u32) -> Option<RefreshOutcome> {
        let (current, total_pages) = {
            let state = self.lock();
            let total_pages = state.results.as_ref().map(|r| r.total_pages).unwrap_or(1);
            (state.query.page(), total_pages)
        };

        if page == current || !pagination::is_navigable(page, total_pages) {
            return None;
        }
        self.dispatch(Q::page_action(page)).await
    }

    pub async fn next_page(&self) -> Option<RefreshOutcome> {
        let current = self.lock().query.page();
        self.go_to_page(current.saturating_add(1)).await
    }

    pub async fn previous_page(&self) -> Option<RefreshOutcome> {
        let current = self.lock().query.page();
        if current <= 1 {
            return None;
        }
        self.go_to_page(current - 1).await
    }

    /// Reset every filter and clear the URL query string.
    pub async fn clear_filters(&self) -> Option<RefreshOutcome> {
        self.dispatch(Q::clear_action()).await
    }

    /// Query the catalog for the current filter value.
    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = self.inner.sequencer.issue();
        let query = {
            let mut state = self.lock();
            state.in_flight += 1;
            state.query.clone()
        };
        // Decrements in_flight even if a debounced refresh is aborted mid-fetch
        let in_flight = InFlight(self);
        debug!(seq = ticket.seq(), page = query.page(), "Issuing listing query");

        let result = query
            .fetch(self.inner.catalog.as_ref(), self.inner.page_size)
            .await;
        drop(in_flight);

        if !self.inner.sequencer.is_latest(ticket) {
            debug!(seq = ticket.seq(), "Discarding stale listing response");
            return RefreshOutcome::Stale;
        }

        match result {
            Ok(mut page) => {
                page.jobs.retain(|job| {
                    let visible = job.is_publicly_visible();
                    if !visible {
                        warn!(job_id = %job.id, "Dropping job hidden from public listings");
                    }
                    visible
                });
                match query.sort_by() {
                    Some(sort_by) => sort_jobs(&mut page.jobs, sort_by),
                    None => page.jobs.sort_by_key(|job| job.is_archived),
                }
                debug!(
                    seq = ticket.seq(),
                    total = page.total,
                    shown = page.jobs.len(),
                    "Applied listing response"
                );
                self.lock().results = Some(page);
                RefreshOutcome::Applied
            }
            Err(e) => {
                warn!(seq = ticket.seq(), error = %e, "Listing query failed");
                self.inner
                    .navigator
                    .notify(Notice::error(format!("Couldn't load jobs: {}", e)));
                if let Some(route) = query.failure_route() {
                    self.inner.navigator.navigate(route);
                }
                RefreshOutcome::Failed
            }
        }
    }

    pub fn snapshot(&self) -> ListingSnapshot<Q> {
        let state = self.lock();
        let current = state.query.page();
        let (jobs, total, total_pages, meta) = match &state.results {
            Some(page) => (
                page.jobs.clone(),
                page.total,
                page.total_pages,
                Some(page.meta.clone()),
            ),
            None => (Vec::new(), 0, 1, None),
        };

        let view = match &state.results {
            None if state.in_flight > 0 => ListingView::Loading,
            None => ListingView::Unavailable,
            Some(page) if page.total == 0 || page.jobs.is_empty() => ListingView::Empty {
                can_reset: state.query.has_filters() || current > 1,
            },
            Some(_) => ListingView::Results,
        };

        ListingSnapshot {
            query: state.query.clone(),
            jobs,
            total,
            total_pages,
            page_window: pagination::page_window(current, total_pages, self.inner.page_window),
            controls: PageControls::new(current, total_pages),
            meta,
            loading: state.in_flight > 0,
            view,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListingState<Q>> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct InFlight<'a, Q: ListingQuery>(&'a ListingController<Q>);

impl<Q: ListingQuery> Drop for InFlight<'_, Q> {
    fn drop(&mut self) {
        let mut state = self.0.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}
