//! Search/filter state for the public job listing.
//!
//! [`FilterState`] is an immutable value: every user interaction is a
//! [`FilterAction`] reduced into a new state. The same value is the source for
//! the catalog request ([`FilterState::to_search_query`]) and for the URL query
//! string ([`FilterState::to_query_string`]), so the two never disagree.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::pagination::PageRequest;
use crate::salary::Salary;
use crate::types::{Job, JobType};

// ============================================================================
// Sort order
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Newest,
    Oldest,
    SalaryHigh,
    SalaryLow,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::Oldest => "oldest",
            SortBy::SalaryHigh => "salary_high",
            SortBy::SalaryLow => "salary_low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Newest => "Newest first",
            SortBy::Oldest => "Oldest first",
            SortBy::SalaryHigh => "Salary: high to low",
            SortBy::SalaryLow => "Salary: low to high",
        }
    }

    pub fn variants() -> &'static [SortBy] {
        &[
            SortBy::Newest,
            SortBy::Oldest,
            SortBy::SalaryHigh,
            SortBy::SalaryLow,
        ]
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::variants()
            .iter()
            .copied()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| format!("unknown sort order: {}", s))
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Order jobs by `sort_by`, with archived jobs always after non-archived ones.
///
/// The sort is stable: jobs with equal keys keep the order the server sent.
pub fn sort_jobs(jobs: &mut [Job], sort_by: SortBy) {
    jobs.sort_by(|a, b| {
        a.is_archived.cmp(&b.is_archived).then_with(|| match sort_by {
            SortBy::Newest => b.created_at.cmp(&a.created_at),
            SortBy::Oldest => a.created_at.cmp(&b.created_at),
            SortBy::SalaryHigh => compare_salary(a, b, true),
            SortBy::SalaryLow => compare_salary(a, b, false),
        })
    });
}

/// Amounts by value, jobs without a numeric salary last in both directions.
fn compare_salary(a: &Job, b: &Job, descending: bool) -> Ordering {
    match (salary_key(a, descending), salary_key(b, descending)) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn salary_key(job: &Job, high_end: bool) -> Option<f64> {
    let (first, second) = if high_end {
        (&job.salary_max, &job.salary_min)
    } else {
        (&job.salary_min, &job.salary_max)
    };
    first
        .as_ref()
        .and_then(Salary::amount)
        .or_else(|| second.as_ref().and_then(Salary::amount))
}

// ============================================================================
// Filter state
// ============================================================================

/// When a state change should reach the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requery {
    /// Free-text edits wait for the typing to pause.
    Debounced,
    Immediate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    /// Keystroke in the search box.
    SetSearchTerm(String),
    /// Search box submitted (Enter or the search button).
    SubmitSearch(String),
    /// `None` means "all categories".
    SetCategory(Option<String>),
    SetJobType(Option<JobType>),
    SetSortBy(SortBy),
    SetPage(u32),
    Clear,
}

impl FilterAction {
    pub fn requery(&self) -> Requery {
        match self {
            FilterAction::SetSearchTerm(_) => Requery::Debounced,
            _ => Requery::Immediate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search_term: String,
    pub category: Option<String>,
    pub job_type: Option<JobType>,
    pub sort_by: SortBy,
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            search_term: String::new(),
            category: None,
            job_type: None,
            sort_by: SortBy::default(),
            page: 1,
        }
    }
}

impl FilterState {
    /// Reduce an action into the next state. Any change other than the page
    /// itself sends the user back to page 1.
    pub fn apply(&self, action: &FilterAction) -> FilterState {
        match action {
            FilterAction::SetSearchTerm(term) | FilterAction::SubmitSearch(term) => FilterState {
                search_term: term.clone(),
                page: 1,
                ..self.clone()
            },
            FilterAction::SetCategory(category) => FilterState {
                category: normalize_category(category.as_deref()),
                page: 1,
                ..self.clone()
            },
            FilterAction::SetJobType(job_type) => FilterState {
                job_type: *job_type,
                page: 1,
                ..self.clone()
            },
            FilterAction::SetSortBy(sort_by) => FilterState {
                sort_by: *sort_by,
                page: 1,
                ..self.clone()
            },
            FilterAction::SetPage(page) => FilterState {
                page: (*page).max(1),
                ..self.clone()
            },
            FilterAction::Clear => FilterState::default(),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == FilterState::default()
    }

    /// Whether any narrowing filter is set (page and sort excluded).
    pub fn has_filters(&self) -> bool {
        !self.search_term.trim().is_empty() || self.category.is_some() || self.job_type.is_some()
    }

    /// Catalog request for the current page. Defaults are omitted.
    pub fn to_search_query(&self, page_size: u32) -> SearchQuery {
        let term = self.search_term.trim();
        SearchQuery {
            page: PageRequest::new(self.page, page_size),
            q: (!term.is_empty()).then(|| term.to_string()),
            category: self.category.clone(),
            job_type: self.job_type,
            sort_by: (self.sort_by != SortBy::default()).then_some(self.sort_by),
        }
    }

    // ------------------------------------------------------------------------
    // URL round-trip
    // ------------------------------------------------------------------------

    /// Query string (without `?`) holding only non-default fields.
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if !self.search_term.is_empty() {
            out.append_pair("q", &self.search_term);
        }
        if let Some(category) = &self.category {
            out.append_pair("category", category);
        }
        if let Some(job_type) = self.job_type {
            out.append_pair("job_type", job_type.as_str());
        }
        if self.sort_by != SortBy::default() {
            out.append_pair("sort_by", self.sort_by.as_str());
        }
        if self.page > 1 {
            out.append_pair("page", &self.page.to_string());
        }
        out.finish()
    }

    /// Rebuild state from a query string. Unknown keys and unparseable values
    /// are ignored so a hand-edited URL still opens the listing.
    pub fn from_query_string(query: &str) -> FilterState {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = FilterState::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "q" => state.search_term = value.into_owned(),
                "category" => state.category = normalize_category(Some(&value)),
                "job_type" => state.job_type = value.parse().ok(),
                "sort_by" => state.sort_by = value.parse().unwrap_or_default(),
                "page" => state.page = value.parse::<u32>().ok().filter(|p| *p > 0).unwrap_or(1),
                _ => {}
            }
        }
        state
    }
}

fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

// ============================================================================
// Catalog request
// ============================================================================

/// `GET /api/jobs/search` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub page: PageRequest,
    pub q: Option<String>,
    pub category: Option<String>,
    pub job_type: Option<JobType>,
    pub sort_by: Option<SortBy>,
}

impl SearchQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("skip", self.page.offset.to_string()),
            ("limit", self.page.limit.to_string()),
        ];
        if let Some(q) = &self.q {
            params.push(("q", q.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(job_type) = self.job_type {
            params.push(("job_type", job_type.as_str().to_string()));
        }
        if let Some(sort_by) = self.sort_by {
            params.push(("sort_by", sort_by.as_str().to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::job;
    use proptest::prelude::*;

    #[test]
    fn field_changes_reset_page() {
        let state = FilterState {
            page: 4,
            ..Default::default()
        };

        for action in [
            FilterAction::SetSearchTerm("nurse".into()),
            FilterAction::SubmitSearch("nurse".into()),
            FilterAction::SetCategory(Some("nurses".into())),
            FilterAction::SetJobType(Some(JobType::Contract)),
            FilterAction::SetSortBy(SortBy::Oldest),
        ] {
            assert_eq!(state.apply(&action).page, 1, "{:?}", action);
        }

        assert_eq!(state.apply(&FilterAction::SetPage(7)).page, 7);
    }

    #[test]
    fn only_keystrokes_are_debounced() {
        assert_eq!(
            FilterAction::SetSearchTerm("n".into()).requery(),
            Requery::Debounced
        );
        assert_eq!(
            FilterAction::SubmitSearch("n".into()).requery(),
            Requery::Immediate
        );
        assert_eq!(FilterAction::SetPage(2).requery(), Requery::Immediate);
        assert_eq!(FilterAction::Clear.requery(), Requery::Immediate);
    }

    #[test]
    fn all_category_means_no_category() {
        let state = FilterState::default().apply(&FilterAction::SetCategory(Some("all".into())));
        assert_eq!(state.category, None);
        assert!(FilterState::from_query_string("category=all").is_default());
    }

    #[test]
    fn clear_resets_everything() {
        let state = FilterState::from_query_string("q=icu&category=nurses&page=3");
        let cleared = state.apply(&FilterAction::Clear);
        assert!(cleared.is_default());
        assert_eq!(cleared.to_query_string(), "");
    }

    #[test]
    fn url_round_trip_for_category_job_type_and_page() {
        let state = FilterState::default()
            .apply(&FilterAction::SetCategory(Some("nurses".into())))
            .apply(&FilterAction::SetJobType(Some(JobType::Contract)))
            .apply(&FilterAction::SetPage(2));

        let query = state.to_query_string();
        assert_eq!(query, "category=nurses&job_type=contract&page=2");
        assert_eq!(FilterState::from_query_string(&query), state);
        assert_eq!(FilterState::from_query_string(&format!("?{}", query)), state);
    }

    #[test]
    fn search_query_omits_defaults() {
        let params = FilterState::default().to_search_query(20).to_params();
        assert_eq!(
            params,
            vec![("skip", "0".to_string()), ("limit", "20".to_string())]
        );

        let state = FilterState::from_query_string("q=%20icu%20&job_type=part_time&sort_by=oldest&page=3");
        let params = state.to_search_query(20).to_params();
        assert_eq!(
            params,
            vec![
                ("skip", "40".to_string()),
                ("limit", "20".to_string()),
                ("q", "icu".to_string()),
                ("job_type", "part_time".to_string()),
                ("sort_by", "oldest".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_url_values_fall_back_to_defaults() {
        let state = FilterState::from_query_string("page=0&job_type=gig&sort_by=random&utm_source=x");
        assert!(state.is_default());
        let state = FilterState::from_query_string("page=-2");
        assert_eq!(state.page, 1);
    }

    #[test]
    fn archived_jobs_sort_last_for_every_order() {
        let mut base = vec![
            job("a").archived().created("2024-01-05T00:00:00Z").salary(90_000.0),
            job("b").created("2024-01-01T00:00:00Z").salary(10_000.0),
            job("c").archived().created("2024-01-09T00:00:00Z").salary(5_000.0),
            job("d").created("2024-01-03T00:00:00Z").salary(50_000.0),
        ]
        .into_iter()
        .map(|b| b.build())
        .collect::<Vec<_>>();

        for sort_by in SortBy::variants() {
            sort_jobs(&mut base, *sort_by);
            let first_archived = base.iter().position(|j| j.is_archived).unwrap();
            assert!(base[..first_archived].iter().all(|j| !j.is_archived));
            assert!(base[first_archived..].iter().all(|j| j.is_archived));
        }
    }

    #[test]
    fn sorts_within_groups() {
        let mut jobs: Vec<Job> = vec![
            job("old").created("2024-01-01T00:00:00Z").salary(10_000.0).build(),
            job("new").created("2024-02-01T00:00:00Z").salary(70_000.0).build(),
            job("label").created("2024-01-15T00:00:00Z").salary_label("Negotiable").build(),
        ];

        sort_jobs(&mut jobs, SortBy::Newest);
        let ids: Vec<_> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["new", "label", "old"]);

        sort_jobs(&mut jobs, SortBy::SalaryHigh);
        let ids: Vec<_> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["new", "old", "label"]);

        sort_jobs(&mut jobs, SortBy::SalaryLow);
        let ids: Vec<_> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["old", "new", "label"]);
    }

    fn arb_state() -> impl Strategy<Value = FilterState> {
        (
            "[a-z &%+=?]{0,12}",
            proptest::option::of("[a-z-]{1,10}"),
            proptest::option::of(proptest::sample::select(JobType::variants().to_vec())),
            proptest::sample::select(SortBy::variants().to_vec()),
            1u32..500,
        )
            .prop_map(|(search_term, category, job_type, sort_by, page)| FilterState {
                search_term,
                category: category.filter(|c| c != "all"),
                job_type,
                sort_by,
                page,
            })
    }

    proptest! {
        #[test]
        fn url_round_trip_is_lossless(state in arb_state()) {
            let rebuilt = FilterState::from_query_string(&state.to_query_string());
            prop_assert_eq!(rebuilt, state);
        }
    }
}
