//! Application context with shared state and utilities

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::sync::Arc;

use job_discovery::{
    AppliedJobs, BoardConfig, GateDeps, HttpJobCatalog, JobCatalog, Session,
};

use crate::terminal::TerminalNavigator;

/// Application context passed to all commands
pub struct AppContext {
    pub config: BoardConfig,
    pub catalog: Arc<dyn JobCatalog>,
    pub navigator: Arc<TerminalNavigator>,
    pub session: Session,
    pub applied: AppliedJobs,
    pub quiet: bool,
}

impl AppContext {
    pub fn new(config: BoardConfig, quiet: bool) -> Result<Self> {
        let catalog = HttpJobCatalog::new(&config.api_url, config.request_timeout)?;
        let navigator = TerminalNavigator::new(&config.site_url, quiet);
        Ok(Self {
            session: Session::from_token(config.auth_token.clone()),
            catalog: Arc::new(catalog),
            navigator: Arc::new(navigator),
            applied: AppliedJobs::new(),
            config,
            quiet,
        })
    }

    pub fn gate_deps(&self) -> GateDeps {
        GateDeps {
            catalog: self.catalog.clone(),
            navigator: self.navigator.clone(),
            applied: self.applied.clone(),
            handoff_delay: self.config.handoff_delay,
        }
    }

    pub fn theme(&self) -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.quiet {
            return Ok(default);
        }
        Ok(Confirm::with_theme(&self.theme())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("{}", style(msg).bold());
        }
    }

    pub fn print_warning(&self, msg: &str) {
        println!("{}", style(msg).yellow());
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).dim());
        }
    }
}
