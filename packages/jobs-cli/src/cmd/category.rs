//! Category landing pages

use anyhow::Result;
use clap::Args;

use job_discovery::{CategoryBoard, CategoryFilter, JobType, RefreshOutcome};

use crate::context::AppContext;
use crate::render;

#[derive(Args, Debug)]
pub struct CategoryArgs {
    /// Category slug, e.g. nurses
    pub slug: String,

    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(short = 't', long)]
    pub job_type: Option<JobType>,

    /// Maximum years of experience required
    #[arg(short, long)]
    pub experience: Option<u32>,

    #[arg(short, long, default_value_t = 1)]
    pub page: u32,
}

pub async fn run(ctx: &AppContext, args: CategoryArgs) -> Result<()> {
    let filter = CategoryFilter {
        location: args.location.unwrap_or_default(),
        job_type: args.job_type,
        max_experience: args.experience,
        page: args.page.max(1),
        ..CategoryFilter::new(args.slug.trim_matches('/'))
    };
    let board = CategoryBoard::new(
        filter,
        ctx.catalog.clone(),
        ctx.navigator.clone(),
        &ctx.config,
    );

    // A missing category sends the navigator back to the main listing
    if board.refresh().await == RefreshOutcome::Failed {
        ctx.print_warning("Try `jobs search` to browse every category.");
        anyhow::bail!("category {} could not be loaded", args.slug);
    }

    let snapshot = board.snapshot();
    if let Some(info) = &snapshot.meta {
        render::category_heading(info);
        println!();
    }
    render::listing(&snapshot);
    Ok(())
}
