//! Job discovery and application gating for the healthcare job board.
//!
//! The client-side core behind the public job listings: filter state that
//! survives in the URL, debounced search, paginated and sorted result sets,
//! category landing pages, and the gate that decides whether a visitor
//! applies directly, leaves their details as a lead, or is handed off to an
//! employer's own site.
//!
//! Rendering is not in here. UI effects (URL updates, scrolling, toasts,
//! navigation) go through the [`Navigator`] trait and all data goes through
//! the [`JobCatalog`] trait, so the same controllers back a browser front end
//! or the `jobs` terminal client.
//!
//! # Usage
//!
//! ```rust,ignore
//! use job_discovery::{BoardConfig, FilterAction, HttpJobCatalog, JobBoard};
//!
//! let config = BoardConfig::from_env()?;
//! let catalog = Arc::new(HttpJobCatalog::new(&config.api_url, config.request_timeout)?);
//! let board = JobBoard::from_url("category=nurses", catalog, navigator, &config);
//!
//! board.refresh().await;
//! board.dispatch(FilterAction::SetSearchTerm("icu".into())).await;
//! let snapshot = board.snapshot();
//! ```
//!
//! # Modules
//!
//! - [`filter`] - Search filter state, URL sync and sorting
//! - [`category`] - Category page filters
//! - [`listing`] - Controllers that turn filter changes into result pages
//! - [`gate`] - Apply routing: direct, lead capture, external handoff
//! - [`lead`] - Lead form validation
//! - [`catalog`] - Job catalog trait and HTTP implementation
//! - [`testing`] - Mock catalog and recording navigator

pub mod catalog;
pub mod category;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod gate;
pub mod lead;
pub mod listing;
pub mod navigator;
pub mod pagination;
pub mod salary;
pub mod sequence;
pub mod session;
pub mod testing;
pub mod types;

pub use catalog::{HttpJobCatalog, JobCatalog};
pub use category::{CategoryAction, CategoryFilter, CategoryQuery};
pub use config::BoardConfig;
pub use debounce::Debouncer;
pub use error::{DiscoveryError, Result};
pub use filter::{sort_jobs, FilterAction, FilterState, Requery, SearchQuery, SortBy};
pub use gate::{decide, ApplicationGate, ApplyPath, GateDeps, GateOutcome, GateState, Handoff};
pub use lead::{validate_field, ExperienceBand, FieldErrors, Lead, LeadField, LeadForm};
pub use listing::{
    CategoryBoard, JobBoard, ListingController, ListingQuery, ListingSnapshot, ListingView,
    RefreshOutcome, ResultPage,
};
pub use navigator::{Navigator, Notice, NoticeLevel, Route};
pub use pagination::{page_window, PageControls, PageRequest};
pub use salary::{format_salary_range, Salary};
pub use sequence::{RequestSequencer, Ticket};
pub use session::{AppliedJobs, Session};
pub use types::{
    Application, ApplicationReceipt, CategoryInfo, CategoryResponse, Currency, Job, JobId,
    JobType, LeadAck, SearchResponse,
};
