//! UI side effects requested by the listing controllers and the gate.
//!
//! The rendering layer implements [`Navigator`]; the core never touches the
//! browser (or terminal) directly.

use std::fmt;

use url::form_urlencoded;

use crate::types::JobId;

/// Pages the core can send the visitor to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Generic job listing.
    Listing,
    /// Job detail page, keyed by slug or id.
    JobDetail(String),
    /// Account registration carrying the interest that led there.
    Register { job_id: JobId, email: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Listing => "/jobs".to_string(),
            Route::JobDetail(key) => format!("/jobs/{}", key),
            Route::Register { job_id, email } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("job_id", job_id.as_str())
                    .append_pair("email", email)
                    .finish();
                format!("/register?{}", query)
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Transient, user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Effects the core asks the host UI to perform.
pub trait Navigator: Send + Sync {
    /// Replace the current URL's query string (no history entry). An empty
    /// string clears it.
    fn replace_query(&self, query: &str);

    /// Scroll the viewport to the top of the result list.
    fn scroll_to_top(&self);

    fn notify(&self, notice: Notice);

    fn navigate(&self, route: Route);

    /// Open an external URL in a new context (tab, browser window).
    fn open_external(&self, url: &str);
}
