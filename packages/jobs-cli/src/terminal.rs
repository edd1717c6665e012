//! Terminal rendition of the UI effects a listing or gate requests.

use colored::Colorize;
use console::Term;
use std::sync::Mutex;
use tracing::{debug, warn};

use job_discovery::{Navigator, Notice, NoticeLevel, Route};

pub struct TerminalNavigator {
    site_url: String,
    quiet: bool,
    location: Mutex<String>,
}

impl TerminalNavigator {
    pub fn new(site_url: &str, quiet: bool) -> Self {
        Self {
            site_url: site_url.trim_end_matches('/').to_string(),
            quiet,
            location: Mutex::new(Route::Listing.path()),
        }
    }

    /// Shareable link for the page the visitor is on.
    pub fn current_url(&self) -> String {
        let location = self.location.lock().unwrap_or_else(|e| e.into_inner());
        format!("{}{}", self.site_url, location)
    }

    fn set_location(&self, location: String) {
        *self.location.lock().unwrap_or_else(|e| e.into_inner()) = location;
    }
}

impl Navigator for TerminalNavigator {
    fn replace_query(&self, query: &str) {
        let path = Route::Listing.path();
        let location = if query.is_empty() {
            path
        } else {
            format!("{}?{}", path, query)
        };
        debug!(%location, "Listing URL updated");
        self.set_location(location);
    }

    fn scroll_to_top(&self) {
        if !self.quiet {
            let _ = Term::stdout().clear_screen();
        }
    }

    fn notify(&self, notice: Notice) {
        let line = match notice.level {
            NoticeLevel::Success => format!("✓ {}", notice.message).green(),
            NoticeLevel::Info => notice.message.normal(),
            NoticeLevel::Error => format!("✗ {}", notice.message).red().bold(),
        };
        println!("{}", line);
    }

    fn navigate(&self, route: Route) {
        let path = route.path();
        self.set_location(path.clone());
        if let Route::Register { .. } = route {
            let url = format!("{}{}", self.site_url, path);
            println!("{} {}", "Create your account to finish applying:".bold(), url.cyan());
            if let Err(e) = open::that(&url) {
                warn!(error = %e, "Could not open browser");
            }
        }
    }

    fn open_external(&self, url: &str) {
        println!("Opening {}", url.cyan().underline());
        if let Err(e) = open::that(url) {
            warn!(error = %e, %url, "Could not open browser");
            println!("Open this link to continue: {}", url);
        }
    }
}
