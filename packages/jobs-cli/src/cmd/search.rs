//! One-shot job search

use anyhow::Result;
use clap::Args;

use job_discovery::{FilterState, JobBoard, JobType, RefreshOutcome, SortBy};

use crate::context::AppContext;
use crate::render;

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Free-text search term
    pub query: Option<String>,

    /// Category slug, e.g. nurses
    #[arg(short, long)]
    pub category: Option<String>,

    /// full_time, part_time, contract or internship
    #[arg(short = 't', long)]
    pub job_type: Option<JobType>,

    /// newest, oldest, salary_high or salary_low
    #[arg(short, long, default_value = "newest")]
    pub sort: SortBy,

    #[arg(short, long, default_value_t = 1)]
    pub page: u32,
}

impl SearchArgs {
    pub fn to_filter(&self) -> FilterState {
        FilterState {
            search_term: self.query.clone().unwrap_or_default(),
            category: self.category.clone(),
            job_type: self.job_type,
            sort_by: self.sort,
            page: self.page.max(1),
        }
    }
}

pub async fn run(ctx: &AppContext, args: SearchArgs) -> Result<()> {
    let board = JobBoard::new(
        args.to_filter(),
        ctx.catalog.clone(),
        ctx.navigator.clone(),
        &ctx.config,
    );

    if board.refresh().await == RefreshOutcome::Failed {
        anyhow::bail!("search failed");
    }
    render::listing(&board.snapshot());
    ctx.print_info(&format!("Link: {}", filter_url(ctx, &board)));
    Ok(())
}

fn filter_url(ctx: &AppContext, board: &JobBoard) -> String {
    listing_link(&ctx.config.site_url, &board.query().to_query_string())
}

/// Link to the public listing page with `query` applied.
fn listing_link(site_url: &str, query: &str) -> String {
    let base = format!("{}/jobs", site_url.trim_end_matches('/'));
    if query.is_empty() {
        base
    } else {
        format!("{}?{}", base, query)
    }
}
