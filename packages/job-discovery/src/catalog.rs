//! Client for the remote job catalog.
//!
//! [`JobCatalog`] is the seam between the core and the catalog service.
//! [`HttpJobCatalog`] talks to the REST API; tests use
//! [`crate::testing::MockJobCatalog`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::category::CategoryQuery;
use crate::error::{DiscoveryError, Result};
use crate::filter::SearchQuery;
use crate::lead::Lead;
use crate::types::{
    Application, ApplicationReceipt, CategoryResponse, Job, JobId, LeadAck, SearchResponse,
};

/// Operations the core needs from the catalog service.
#[async_trait]
pub trait JobCatalog: Send + Sync {
    /// `GET /api/jobs/search`
    async fn search_jobs(&self, query: &SearchQuery) -> Result<SearchResponse>;

    /// `GET /api/categories/{category}`
    async fn category_jobs(&self, query: &CategoryQuery) -> Result<CategoryResponse>;

    /// `GET /api/jobs/{id}/details`. Counts as a view on the server.
    async fn job_details(&self, id: &JobId) -> Result<Job>;

    /// `POST /api/jobs/{id}/apply` as the signed-in user.
    async fn apply(
        &self,
        id: &JobId,
        application: &Application,
        token: &str,
    ) -> Result<ApplicationReceipt>;

    /// `POST /api/jobs/{id}/apply-lead`
    async fn submit_lead(&self, id: &JobId, lead: &Lead) -> Result<LeadAck>;
}

/// REST implementation of [`JobCatalog`].
#[derive(Clone)]
pub struct HttpJobCatalog {
    client: Client,
    base_url: Url,
}

impl HttpJobCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DiscoveryError::Config(format!("invalid API URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DiscoveryError::Config(format!(
                "API URL cannot be a base: {}",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let body = check_status(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl JobCatalog for HttpJobCatalog {
    async fn search_jobs(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let url = self.endpoint(&["api", "jobs", "search"]);
        debug!(%url, offset = query.page.offset, "Searching jobs");
        self.send(self.client.get(url).query(&query.to_params()))
            .await
    }

    async fn category_jobs(&self, query: &CategoryQuery) -> Result<CategoryResponse> {
        let url = self.endpoint(&["api", "categories", &query.category]);
        debug!(%url, offset = query.page.offset, "Fetching category jobs");
        self.send(self.client.get(url).query(&query.to_params()))
            .await
    }

    async fn job_details(&self, id: &JobId) -> Result<Job> {
        let url = self.endpoint(&["api", "jobs", id.as_str(), "details"]);
        self.send(self.client.get(url)).await
    }

    async fn apply(
        &self,
        id: &JobId,
        application: &Application,
        token: &str,
    ) -> Result<ApplicationReceipt> {
        let url = self.endpoint(&["api", "jobs", id.as_str(), "apply"]);
        self.send(self.client.post(url).bearer_auth(token).json(application))
            .await
    }

    async fn submit_lead(&self, id: &JobId, lead: &Lead) -> Result<LeadAck> {
        let url = self.endpoint(&["api", "jobs", id.as_str(), "apply-lead"]);
        self.send(self.client.post(url).json(lead)).await
    }
}

// ============================================================================
// Error bodies
// ============================================================================

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let fallback = status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string();
    Err(DiscoveryError::Api {
        status: status.as_u16(),
        reason: error_reason(&body).unwrap_or(fallback),
    })
}

/// The server's stated reason from an error body, if it has one.
pub(crate) fn error_reason(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => {
            let detail = parsed.detail.and_then(|d| match d {
                serde_json::Value::String(s) => Some(s),
                // Validation detail lists: [{"msg": "..."}]
                serde_json::Value::Array(items) => items
                    .iter()
                    .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                    .next()
                    .map(str::to_string),
                _ => None,
            });
            detail.or(parsed.message).or(parsed.error)
        }
        Err(_) => Some(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let catalog = HttpJobCatalog::new("https://jobs.example.com", Duration::from_secs(5));
        assert!(catalog.is_ok());
        assert!(HttpJobCatalog::new("not a url", Duration::from_secs(5)).is_err());
        assert!(HttpJobCatalog::new("mailto:team@example.com", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn endpoints_encode_segments() {
        let catalog =
            HttpJobCatalog::new("https://jobs.example.com/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            catalog.endpoint(&["api", "categories", "ot technicians"]).as_str(),
            "https://jobs.example.com/api/categories/ot%20technicians"
        );

        let prefixed =
            HttpJobCatalog::new("https://example.com/board", Duration::from_secs(5)).unwrap();
        assert_eq!(
            prefixed.endpoint(&["api", "jobs", "42", "details"]).as_str(),
            "https://example.com/board/api/jobs/42/details"
        );
    }

    #[test]
    fn error_reason_prefers_detail() {
        assert_eq!(
            error_reason(r#"{"detail": "Job is closed"}"#).as_deref(),
            Some("Job is closed")
        );
        assert_eq!(
            error_reason(r#"{"detail": [{"loc": ["body", "email"], "msg": "invalid email"}]}"#)
                .as_deref(),
            Some("invalid email")
        );
        assert_eq!(
            error_reason(r#"{"message": "Already applied"}"#).as_deref(),
            Some("Already applied")
        );
        assert_eq!(error_reason("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_reason(""), None);
        assert_eq!(error_reason("{}"), None);
    }
}
