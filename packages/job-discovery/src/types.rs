//! Type definitions for catalog API payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::salary::{format_salary_range, Salary};

// ============================================================================
// Identifiers
// ============================================================================

/// Stable catalog identifier of a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        JobId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        JobId(s.to_string())
    }
}

// ============================================================================
// Job enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[serde(alias = "full-time")]
    FullTime,
    #[serde(alias = "part-time")]
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    /// Wire value, also used as the URL query value.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }

    pub fn variants() -> &'static [JobType] {
        &[
            JobType::FullTime,
            JobType::PartTime,
            JobType::Contract,
            JobType::Internship,
        ]
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "full_time" => Ok(JobType::FullTime),
            "part_time" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "internship" => Ok(JobType::Internship),
            other => Err(format!("unknown job type: {}", other)),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "\u{20B9}", // ₹
            Currency::Usd => "$",
        }
    }
}

// ============================================================================
// Job
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub job_type: JobType,
    #[serde(default)]
    pub salary_min: Option<Salary>,
    #[serde(default)]
    pub salary_max: Option<Salary>,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_true")]
    pub is_approved: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub is_external: bool,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub application_count: u64,
    #[serde(with = "lenient_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "lenient_datetime::option")]
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Job {
    /// Slug when present, otherwise the id. Used for detail routes.
    pub fn route_key(&self) -> &str {
        match self.slug.as_deref() {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => self.id.as_str(),
        }
    }

    /// Whether the public listing may show this job at all.
    pub fn is_publicly_visible(&self) -> bool {
        self.is_approved && !self.is_deleted
    }

    /// The external application URL for externally hosted jobs.
    pub fn external_apply_url(&self) -> Option<&str> {
        if !self.is_external {
            return None;
        }
        self.external_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }

    pub fn salary_display(&self) -> String {
        format_salary_range(
            self.salary_min.as_ref(),
            self.salary_max.as_ref(),
            self.currency,
        )
    }
}

// ============================================================================
// Responses
// ============================================================================

/// `GET /api/jobs/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// Category metadata returned alongside category listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub h1: Option<String>,
    #[serde(default)]
    pub total_count: u64,
}

impl CategoryInfo {
    /// Page heading: explicit h1, then the category name.
    pub fn heading(&self) -> &str {
        self.h1.as_deref().unwrap_or(&self.name)
    }
}

/// `GET /api/categories/{category}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub category: CategoryInfo,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// Body of `POST /api/jobs/{id}/apply`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
}

/// Application record returned by the apply endpoint. Only the fields the
/// gate reads are modelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationReceipt {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Acknowledgment of a captured lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub lead_id: Option<String>,
}

// ============================================================================
// Timestamps
// ============================================================================

/// Accepts RFC 3339 timestamps and naive ISO timestamps (assumed UTC), which
/// the catalog emits interchangeably.
mod lenient_datetime {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.serialize_str(&dt.to_rfc3339()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) if raw.is_empty() => Ok(None),
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw))),
                None => Ok(None),
            }
        }
    }
}
