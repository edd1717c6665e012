//! Application gating: direct application, lead capture, or external handoff.
//!
//! One [`ApplicationGate`] lives for one visit to one job. Routing is a pure
//! function of the job and the visitor's [`Session`] ([`decide`]); the gate
//! executes the chosen path and records the outcome.
//!
//! ```text
//! Idle -> Deciding -> DirectSubmitting -> Terminal(Success | Failed)
//!                  \-> LeadCapturing    -> Terminal(Redirected)
//! ```
//!
//! The session-scoped [`AppliedJobs`] record de-duplicates: a job already
//! applied for is not applied for again, and a job the visitor already left a
//! lead for does not produce a second lead. A lead does not count as an
//! application.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::catalog::JobCatalog;
use crate::error::{DiscoveryError, Result};
use crate::lead::LeadForm;
use crate::navigator::{Navigator, Notice, Route};
use crate::session::{AppliedJobs, Session};
use crate::types::{Application, Job};

// ============================================================================
// Decision
// ============================================================================

/// Path an "apply" activation takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyPath {
    /// Signed-in visitor: submit an application right away.
    Direct,
    /// Anonymous visitor: capture a lead, then register.
    LeadThenRegister,
    /// Anonymous visitor on an externally hosted job: capture a lead, then
    /// open the employer's application URL.
    LeadThenExternal(String),
}

/// Route an apply activation. Depends on nothing but its arguments.
pub fn decide(job: &Job, session: &Session) -> ApplyPath {
    if session.is_authenticated() {
        return ApplyPath::Direct;
    }
    match job.external_apply_url() {
        Some(url) => ApplyPath::LeadThenExternal(url.to_string()),
        None => ApplyPath::LeadThenRegister,
    }
}

/// Where a captured lead sends the visitor next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// Account registration, attributed to the job and lead email.
    Register(Route),
    /// Employer's own application page.
    External(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Application recorded. The apply control becomes a confirmation.
    Success,
    Redirected(Handoff),
    /// Direct submission rejected; `reason` is the server's, verbatim.
    /// [`ApplicationGate::retry`] is allowed from here.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Deciding,
    DirectSubmitting,
    LeadCapturing,
    Terminal(GateOutcome),
}

impl GateState {
    pub fn name(&self) -> &'static str {
        match self {
            GateState::Idle => "idle",
            GateState::Deciding => "deciding",
            GateState::DirectSubmitting => "submitting",
            GateState::LeadCapturing => "capturing a lead",
            GateState::Terminal(GateOutcome::Success) => "applied",
            GateState::Terminal(GateOutcome::Redirected(_)) => "redirected",
            GateState::Terminal(GateOutcome::Failed { .. }) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GateState::Terminal(_))
    }
}

// ============================================================================
// Gate
// ============================================================================

/// Collaborators shared by every gate in a browsing session.
#[derive(Clone)]
pub struct GateDeps {
    pub catalog: Arc<dyn JobCatalog>,
    pub navigator: Arc<dyn Navigator>,
    pub applied: AppliedJobs,
    /// Pause between the success notice and opening an external site.
    pub handoff_delay: Duration,
}

pub struct ApplicationGate {
    job: Job,
    session: Session,
    deps: GateDeps,
    state: GateState,
    application: Application,
    lead_error: Option<String>,
}

impl ApplicationGate {
    pub fn new(job: Job, session: Session, deps: GateDeps) -> Self {
        Self {
            job,
            session,
            deps,
            state: GateState::Idle,
            application: Application::default(),
            lead_error: None,
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Server error from the last lead submission, until dismissed.
    pub fn lead_error(&self) -> Option<&str> {
        self.lead_error.as_deref()
    }

    /// Whether this job is already applied for in this session.
    pub fn is_applied(&self) -> bool {
        self.deps.applied.is_applied(&self.job.id)
    }

    /// Whether a lead for this job was already captured this session.
    pub fn has_expressed_interest(&self) -> bool {
        self.deps.applied.is_interested(&self.job.id)
    }

    /// Visitor activated "apply".
    ///
    /// Signed-in visitors submit `application` immediately; anonymous
    /// visitors land in [`GateState::LeadCapturing`]. A job already applied
    /// for this session goes straight to the confirmation.
    pub async fn apply(&mut self, application: Application) -> Result<()> {
        if self.state != GateState::Idle {
            return Err(self.invalid("apply"));
        }

        self.state = GateState::Deciding;
        let path = decide(&self.job, &self.session);
        debug!(job_id = %self.job.id, ?path, "Apply activated");

        match path {
            ApplyPath::Direct if self.is_applied() => {
                self.state = GateState::Terminal(GateOutcome::Success);
                Ok(())
            }
            ApplyPath::Direct => {
                self.application = application;
                self.submit_direct().await
            }
            ApplyPath::LeadThenRegister | ApplyPath::LeadThenExternal(_) => {
                self.state = GateState::LeadCapturing;
                Ok(())
            }
        }
    }

    /// Re-submit a rejected direct application.
    pub async fn retry(&mut self) -> Result<()> {
        match self.state {
            GateState::Terminal(GateOutcome::Failed { .. }) => self.submit_direct().await,
            _ => Err(self.invalid("retry")),
        }
    }

    /// Submit the lead form.
    ///
    /// Validation failures stay on the form and nothing is sent. A server
    /// failure keeps the form open and populated, with the reason in
    /// [`ApplicationGate::lead_error`].
    pub async fn submit_lead(&mut self, form: &mut LeadForm) -> Result<()> {
        if self.state != GateState::LeadCapturing {
            return Err(self.invalid("submit a lead"));
        }

        let lead = form.to_lead().map_err(DiscoveryError::Validation)?;
        self.lead_error = None;

        // Reserve before sending so a second submission for this job in the
        // same session never reaches the server.
        if self.deps.applied.mark_interested(self.job.id.clone()) {
            if let Err(e) = self.deps.catalog.submit_lead(&self.job.id, &lead).await {
                self.deps.applied.unmark_interested(&self.job.id);
                warn!(job_id = %self.job.id, error = %e, "Lead submission failed");
                self.lead_error = Some(e.to_string());
                return Err(e);
            }
            info!(job_id = %self.job.id, "Lead captured");
        } else {
            debug!(job_id = %self.job.id, "Interest already recorded this session");
        }

        let handoff = self.hand_off(&lead.email).await;
        self.state = GateState::Terminal(GateOutcome::Redirected(handoff));
        Ok(())
    }

    /// Close the lead form without submitting.
    pub fn cancel(&mut self) {
        if self.state == GateState::LeadCapturing {
            self.state = GateState::Idle;
            self.lead_error = None;
        }
    }

    pub fn dismiss_error(&mut self) {
        self.lead_error = None;
    }

    async fn submit_direct(&mut self) -> Result<()> {
        let token = match self.session.token() {
            Some(token) => token.to_string(),
            None => return Err(DiscoveryError::Unauthenticated),
        };

        self.state = GateState::DirectSubmitting;
        match self
            .deps
            .catalog
            .apply(&self.job.id, &self.application, &token)
            .await
        {
            Ok(receipt) => {
                self.deps.applied.mark_applied(self.job.id.clone());
                info!(job_id = %self.job.id, application_id = ?receipt.id, "Application submitted");
                let message = receipt
                    .message
                    .unwrap_or_else(|| "Application submitted".to_string());
                self.deps.navigator.notify(Notice::success(message));
                self.state = GateState::Terminal(GateOutcome::Success);
                Ok(())
            }
            Err(e) => {
                warn!(job_id = %self.job.id, error = %e, "Application failed");
                let reason = e.to_string();
                self.deps.navigator.notify(Notice::error(reason.clone()));
                self.state = GateState::Terminal(GateOutcome::Failed { reason });
                Err(e)
            }
        }
    }

    async fn hand_off(&self, email: &str) -> Handoff {
        match decide(&self.job, &self.session) {
            ApplyPath::LeadThenExternal(url) => {
                self.deps.navigator.notify(Notice::success(format!(
                    "Thanks! Taking you to {} to finish your application",
                    self.job.company
                )));
                tokio::time::sleep(self.deps.handoff_delay).await;
                self.deps.navigator.open_external(&url);
                Handoff::External(url)
            }
            ApplyPath::LeadThenRegister | ApplyPath::Direct => {
                let route = Route::Register {
                    job_id: self.job.id.clone(),
                    email: email.to_string(),
                };
                self.deps.navigator.navigate(route.clone());
                Handoff::Register(route)
            }
        }
    }

    fn invalid(&self, action: &'static str) -> DiscoveryError {
        DiscoveryError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }
}
