//! Testing utilities including mock implementations.
//!
//! These let applications (and this crate's own tests) exercise listings and
//! the application gate without a live catalog or a real UI.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::catalog::JobCatalog;
use crate::category::CategoryQuery;
use crate::error::{DiscoveryError, Result};
use crate::filter::SearchQuery;
use crate::lead::Lead;
use crate::navigator::{Navigator, Notice, NoticeLevel, Route};
use crate::salary::Salary;
use crate::types::{
    Application, ApplicationReceipt, CategoryInfo, CategoryResponse, Currency, Job, JobId,
    JobType, LeadAck, SearchResponse,
};

// ============================================================================
// Job builder
// ============================================================================

/// Start building a test job with sensible defaults.
pub fn job(id: &str) -> JobBuilder {
    JobBuilder {
        job: Job {
            id: JobId::new(id),
            slug: None,
            title: format!("Job {}", id),
            company: "City Hospital".to_string(),
            location: "Pune".to_string(),
            description: String::new(),
            job_type: JobType::FullTime,
            salary_min: None,
            salary_max: None,
            currency: Currency::Inr,
            categories: Vec::new(),
            is_approved: true,
            is_archived: false,
            is_deleted: false,
            is_external: false,
            external_url: None,
            view_count: 0,
            application_count: 0,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            expires_at: None,
        },
    }
}

pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    pub fn title(mut self, title: &str) -> Self {
        self.job.title = title.to_string();
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.job.location = location.to_string();
        self
    }

    pub fn job_type(mut self, job_type: JobType) -> Self {
        self.job.job_type = job_type;
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.job.categories.push(category.to_string());
        self
    }

    pub fn archived(mut self) -> Self {
        self.job.is_archived = true;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.job.is_deleted = true;
        self
    }

    pub fn unapproved(mut self) -> Self {
        self.job.is_approved = false;
        self
    }

    /// RFC 3339 creation timestamp.
    pub fn created(mut self, at: &str) -> Self {
        self.job.created_at = DateTime::parse_from_rfc3339(at)
            .expect("valid RFC 3339 timestamp")
            .with_timezone(&Utc);
        self
    }

    pub fn salary(mut self, amount: f64) -> Self {
        self.job.salary_min = Some(Salary::Amount(amount));
        self.job.salary_max = Some(Salary::Amount(amount));
        self
    }

    pub fn salary_label(mut self, label: &str) -> Self {
        self.job.salary_min = Some(Salary::Label(label.to_string()));
        self.job.salary_max = None;
        self
    }

    pub fn external(mut self, url: &str) -> Self {
        self.job.is_external = true;
        self.job.external_url = Some(url.to_string());
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}

// ============================================================================
// Mock catalog
// ============================================================================

/// Record of a call made to the mock catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCall {
    SearchJobs(SearchQuery),
    CategoryJobs(CategoryQuery),
    JobDetails(JobId),
    Apply {
        job_id: JobId,
        application: Application,
        token: String,
    },
    SubmitLead {
        job_id: JobId,
        lead: Lead,
    },
}

#[derive(Debug, Clone)]
struct Failure {
    status: u16,
    reason: String,
}

impl Failure {
    fn to_error(&self) -> DiscoveryError {
        DiscoveryError::Api {
            status: self.status,
            reason: self.reason.clone(),
        }
    }
}

/// In-memory catalog.
///
/// Searches filter and page the configured jobs the way the real catalog
/// does (soft-deleted and unapproved rows excluded, archived last). Latency
/// and failures are scriptable per call kind.
#[derive(Default)]
pub struct MockJobCatalog {
    jobs: RwLock<Vec<Job>>,
    categories: RwLock<HashMap<String, CategoryInfo>>,
    /// Years of experience a job asks for; absent means none.
    required_experience: RwLock<HashMap<JobId, u32>>,
    /// Search latency keyed by the `q` parameter ("" for none).
    search_delays: RwLock<HashMap<String, Duration>>,
    search_failures: RwLock<HashMap<String, Failure>>,
    fail_all_searches: RwLock<Option<Failure>>,
    apply_failures: RwLock<Vec<Failure>>,
    lead_failures: RwLock<Vec<Failure>>,
    calls: Arc<RwLock<Vec<CatalogCall>>>,
}

impl MockJobCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(self, jobs: Vec<Job>) -> Self {
        *self.jobs.write().unwrap() = jobs;
        self
    }

    /// Register a category so category queries for it succeed.
    pub fn with_category(self, slug: &str, name: &str) -> Self {
        self.categories.write().unwrap().insert(
            slug.to_string(),
            CategoryInfo {
                name: name.to_string(),
                seo_title: Some(format!("{} Jobs", name)),
                meta_description: None,
                h1: None,
                total_count: 0,
            },
        );
        self
    }

    /// Require `years` of experience for job `id`. Category queries with an
    /// experience ceiling below it leave the job out.
    pub fn with_required_experience(self, id: &str, years: u32) -> Self {
        self.required_experience
            .write()
            .unwrap()
            .insert(JobId::new(id), years);
        self
    }

    /// Delay searches whose `q` equals `term` ("" for no term).
    pub fn with_search_delay(self, term: &str, delay: Duration) -> Self {
        self.search_delays
            .write()
            .unwrap()
            .insert(term.to_string(), delay);
        self
    }

    /// Fail searches whose `q` equals `term` ("" for no term).
    pub fn with_search_failure(self, term: &str, status: u16, reason: &str) -> Self {
        self.search_failures.write().unwrap().insert(
            term.to_string(),
            Failure {
                status,
                reason: reason.to_string(),
            },
        );
        self
    }

    /// Make every search fail until cleared with `None`.
    pub fn set_search_outage(&self, outage: Option<(u16, &str)>) {
        *self.fail_all_searches.write().unwrap() = outage.map(|(status, reason)| Failure {
            status,
            reason: reason.to_string(),
        });
    }

    /// Fail the next apply call.
    pub fn fail_next_apply(&self, status: u16, reason: &str) {
        self.apply_failures.write().unwrap().push(Failure {
            status,
            reason: reason.to_string(),
        });
    }

    /// Fail the next lead submission.
    pub fn fail_next_lead(&self, status: u16, reason: &str) {
        self.lead_failures.write().unwrap().push(Failure {
            status,
            reason: reason.to_string(),
        });
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<SearchQuery> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                CatalogCall::SearchJobs(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    pub fn lead_calls(&self) -> Vec<(JobId, Lead)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                CatalogCall::SubmitLead { job_id, lead } => Some((job_id, lead)),
                _ => None,
            })
            .collect()
    }

    pub fn apply_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, CatalogCall::Apply { .. }))
            .count()
    }

    fn record(&self, call: CatalogCall) {
        self.calls.write().unwrap().push(call);
    }

    fn visible_jobs<F>(&self, keep: F) -> Vec<Job>
    where
        F: Fn(&Job) -> bool,
    {
        let mut jobs: Vec<Job> = self
            .jobs
            .read()
            .unwrap()
            .iter()
            .filter(|j| j.is_publicly_visible() && keep(j))
            .cloned()
            .collect();
        jobs.sort_by_key(|j| j.is_archived);
        jobs
    }
}

fn page_of(jobs: Vec<Job>, offset: u64, limit: u32) -> Vec<Job> {
    jobs.into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}

#[async_trait]
impl JobCatalog for MockJobCatalog {
    async fn search_jobs(&self, query: &SearchQuery) -> Result<SearchResponse> {
        self.record(CatalogCall::SearchJobs(query.clone()));

        let term = query.q.clone().unwrap_or_default();
        let delay = self.search_delays.read().unwrap().get(&term).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(failure) = self.fail_all_searches.read().unwrap().as_ref() {
            return Err(failure.to_error());
        }
        if let Some(failure) = self.search_failures.read().unwrap().get(&term) {
            return Err(failure.to_error());
        }

        let needle = term.to_lowercase();
        let matches = self.visible_jobs(|j| {
            (needle.is_empty() || j.title.to_lowercase().contains(&needle))
                && query
                    .category
                    .as_ref()
                    .map(|c| j.categories.contains(c))
                    .unwrap_or(true)
                && query.job_type.map(|t| j.job_type == t).unwrap_or(true)
        });

        let total = matches.len() as u64;
        let limit = query.page.limit.max(1);
        Ok(SearchResponse {
            jobs: page_of(matches, query.page.offset, limit),
            total,
            total_pages: crate::pagination::total_pages(total, limit),
        })
    }

    async fn category_jobs(&self, query: &CategoryQuery) -> Result<CategoryResponse> {
        self.record(CatalogCall::CategoryJobs(query.clone()));

        let info = self.categories.read().unwrap().get(&query.category).cloned();
        let mut info = info.ok_or_else(|| DiscoveryError::Api {
            status: 404,
            reason: "Category not found".to_string(),
        })?;

        let location = query.location.clone().unwrap_or_default().to_lowercase();
        let required = self.required_experience.read().unwrap().clone();
        let matches = self.visible_jobs(|j| {
            j.categories.contains(&query.category)
                && j.location.to_lowercase().contains(&location)
                && query.job_type.map(|t| j.job_type == t).unwrap_or(true)
                && query
                    .experience
                    .map(|max| required.get(&j.id).copied().unwrap_or(0) <= max)
                    .unwrap_or(true)
        });

        info.total_count = matches.len() as u64;
        Ok(CategoryResponse {
            category: info,
            jobs: page_of(matches, query.page.offset, query.page.limit),
        })
    }

    async fn job_details(&self, id: &JobId) -> Result<Job> {
        self.record(CatalogCall::JobDetails(id.clone()));
        let mut jobs = self.jobs.write().unwrap();
        let job = jobs
            .iter_mut()
            .find(|j| &j.id == id && !j.is_deleted)
            .ok_or_else(|| DiscoveryError::Api {
                status: 404,
                reason: "Job not found".to_string(),
            })?;
        job.view_count += 1;
        Ok(job.clone())
    }

    async fn apply(
        &self,
        id: &JobId,
        application: &Application,
        token: &str,
    ) -> Result<ApplicationReceipt> {
        self.record(CatalogCall::Apply {
            job_id: id.clone(),
            application: application.clone(),
            token: token.to_string(),
        });
        if let Some(failure) = self.apply_failures.write().unwrap().pop() {
            return Err(failure.to_error());
        }
        Ok(ApplicationReceipt {
            id: Some(format!("app-{}", id)),
            status: Some("submitted".to_string()),
            message: None,
        })
    }

    async fn submit_lead(&self, id: &JobId, lead: &Lead) -> Result<LeadAck> {
        self.record(CatalogCall::SubmitLead {
            job_id: id.clone(),
            lead: lead.clone(),
        });
        if let Some(failure) = self.lead_failures.write().unwrap().pop() {
            return Err(failure.to_error());
        }
        Ok(LeadAck {
            message: Some("Thanks for your interest".to_string()),
            lead_id: Some(format!("lead-{}", id)),
        })
    }
}

// ============================================================================
// Recording navigator
// ============================================================================

/// Record of a UI effect requested from the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEffect {
    ReplaceQuery(String),
    ScrollToTop,
    Notify(Notice),
    Navigate(Route),
    OpenExternal(String),
}

/// Navigator that records every effect for assertions.
#[derive(Default)]
pub struct RecordingNavigator {
    effects: RwLock<Vec<NavEffect>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> Vec<NavEffect> {
        self.effects.read().unwrap().clone()
    }

    /// Current URL query string (last replacement).
    pub fn current_query(&self) -> Option<String> {
        self.effects().into_iter().rev().find_map(|e| match e {
            NavEffect::ReplaceQuery(q) => Some(q),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                NavEffect::Notify(n) if n.level == NoticeLevel::Error => Some(n.message),
                _ => None,
            })
            .collect()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                NavEffect::Navigate(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn opened(&self) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                NavEffect::OpenExternal(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn scrolls(&self) -> usize {
        self.effects()
            .iter()
            .filter(|e| matches!(e, NavEffect::ScrollToTop))
            .count()
    }

    fn push(&self, effect: NavEffect) {
        self.effects.write().unwrap().push(effect);
    }
}

impl Navigator for RecordingNavigator {
    fn replace_query(&self, query: &str) {
        self.push(NavEffect::ReplaceQuery(query.to_string()));
    }

    fn scroll_to_top(&self) {
        self.push(NavEffect::ScrollToTop);
    }

    fn notify(&self, notice: Notice) {
        self.push(NavEffect::Notify(notice));
    }

    fn navigate(&self, route: Route) {
        self.push(NavEffect::Navigate(route));
    }

    fn open_external(&self, url: &str) {
        self.push(NavEffect::OpenExternal(url.to_string()));
    }
}
