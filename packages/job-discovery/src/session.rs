//! Visitor session passed explicitly into the application gate.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::types::JobId;

/// Authentication state of the visitor.
#[derive(Debug, Clone, Default)]
pub struct Session {
    auth_token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { auth_token: None }
    }

    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            auth_token: Some(token.into()),
        }
    }

    /// Session from a token read out of durable client storage. Blank
    /// tokens count as signed out.
    pub fn from_token(token: Option<String>) -> Self {
        Self {
            auth_token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

/// Session-scoped record of jobs the visitor applied to and jobs they only
/// expressed interest in through a lead. Cloning shares the record.
///
/// The two sets are separate: a lead never stands in for an application.
#[derive(Debug, Clone, Default)]
pub struct AppliedJobs {
    inner: Arc<Mutex<JobSets>>,
}

#[derive(Debug, Default)]
struct JobSets {
    applied: HashSet<JobId>,
    interested: HashSet<JobId>,
}

impl AppliedJobs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_applied(&self, id: &JobId) -> bool {
        self.lock().applied.contains(id)
    }

    /// Record a submitted application. Returns `false` if already recorded.
    pub fn mark_applied(&self, id: JobId) -> bool {
        self.lock().applied.insert(id)
    }

    pub fn is_interested(&self, id: &JobId) -> bool {
        self.lock().interested.contains(id)
    }

    /// Record a captured lead. Returns `false` if one was already recorded.
    pub fn mark_interested(&self, id: JobId) -> bool {
        self.lock().interested.insert(id)
    }

    pub fn unmark_interested(&self, id: &JobId) -> bool {
        self.lock().interested.remove(id)
    }

    pub fn applied_count(&self) -> usize {
        self.lock().applied.len()
    }

    pub fn is_empty(&self) -> bool {
        let sets = self.lock();
        sets.applied.is_empty() && sets.interested.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, JobSets> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
