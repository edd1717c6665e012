//! Filter state for category pages (`/jobs/category/{category}`).
//!
//! The category itself comes from the path segment and never changes for the
//! life of a page; the remaining filters live in the query string.

use url::form_urlencoded;

use crate::filter::Requery;
use crate::pagination::PageRequest;
use crate::types::JobType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryAction {
    /// Keystroke in the location box.
    SetLocation(String),
    /// Location box submitted.
    SubmitLocation(String),
    SetJobType(Option<JobType>),
    /// Maximum years of experience the visitor wants to see.
    SetMaxExperience(Option<u32>),
    SetPage(u32),
    Clear,
}

impl CategoryAction {
    pub fn requery(&self) -> Requery {
        match self {
            CategoryAction::SetLocation(_) => Requery::Debounced,
            _ => Requery::Immediate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    pub category: String,
    pub location: String,
    pub job_type: Option<JobType>,
    pub max_experience: Option<u32>,
    pub page: u32,
}

impl CategoryFilter {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            location: String::new(),
            job_type: None,
            max_experience: None,
            page: 1,
        }
    }

    pub fn apply(&self, action: &CategoryAction) -> CategoryFilter {
        match action {
            CategoryAction::SetLocation(location) | CategoryAction::SubmitLocation(location) => {
                CategoryFilter {
                    location: location.clone(),
                    page: 1,
                    ..self.clone()
                }
            }
            CategoryAction::SetJobType(job_type) => CategoryFilter {
                job_type: *job_type,
                page: 1,
                ..self.clone()
            },
            CategoryAction::SetMaxExperience(years) => CategoryFilter {
                max_experience: *years,
                page: 1,
                ..self.clone()
            },
            CategoryAction::SetPage(page) => CategoryFilter {
                page: (*page).max(1),
                ..self.clone()
            },
            CategoryAction::Clear => CategoryFilter::new(self.category.clone()),
        }
    }

    pub fn has_filters(&self) -> bool {
        !self.location.trim().is_empty() || self.job_type.is_some() || self.max_experience.is_some()
    }

    pub fn to_category_query(&self, page_size: u32) -> CategoryQuery {
        let location = self.location.trim();
        CategoryQuery {
            category: self.category.clone(),
            page: PageRequest::new(self.page, page_size),
            location: (!location.is_empty()).then(|| location.to_string()),
            job_type: self.job_type,
            experience: self.max_experience,
        }
    }

    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if !self.location.is_empty() {
            out.append_pair("location", &self.location);
        }
        if let Some(job_type) = self.job_type {
            out.append_pair("job_type", job_type.as_str());
        }
        if let Some(years) = self.max_experience {
            out.append_pair("experience", &years.to_string());
        }
        if self.page > 1 {
            out.append_pair("page", &self.page.to_string());
        }
        out.finish()
    }

    /// Rebuild from the path's category segment and the query string.
    pub fn from_url(category: &str, query: &str) -> CategoryFilter {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut filter = CategoryFilter::new(category.trim_matches('/'));
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "location" => filter.location = value.into_owned(),
                "job_type" => filter.job_type = value.parse().ok(),
                "experience" => filter.max_experience = value.parse().ok(),
                "page" => filter.page = value.parse::<u32>().ok().filter(|p| *p > 0).unwrap_or(1),
                _ => {}
            }
        }
        filter
    }
}

/// `GET /api/categories/{category}` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryQuery {
    pub category: String,
    pub page: PageRequest,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience: Option<u32>,
}

impl CategoryQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("skip", self.page.offset.to_string()),
            ("limit", self.page.limit.to_string()),
        ];
        if let Some(location) = &self.location {
            params.push(("location", location.clone()));
        }
        if let Some(job_type) = self.job_type {
            params.push(("job_type", job_type.as_str().to_string()));
        }
        if let Some(years) = self.experience {
            params.push(("experience", years.to_string()));
        }
        params
    }
}
