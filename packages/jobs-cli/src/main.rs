//! `jobs`: browse and apply for healthcare jobs from the terminal.

mod cmd;
mod context;
mod render;
mod terminal;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use job_discovery::BoardConfig;

use crate::cmd::{category::CategoryArgs, search::SearchArgs};
use crate::context::AppContext;

#[derive(Parser)]
#[command(name = "jobs")]
#[command(about = "Search healthcare jobs and apply")]
#[command(version)]
struct Cli {
    /// Run in quiet mode (non-interactive)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Job board API base URL (overrides JOBBOARD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Public site URL used for shareable links (overrides JOBBOARD_SITE_URL)
    #[arg(long, global = true)]
    site_url: Option<String>,

    /// Access token of a signed-in user (overrides JOBBOARD_AUTH_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive listing with paging and filters
    Browse(SearchArgs),

    /// Print one page of search results
    Search(SearchArgs),

    /// Print one page of a category
    Category(CategoryArgs),

    /// Show a job and optionally apply
    Show {
        /// Job id or slug
        id: String,
    },

    /// Apply for a job
    Apply {
        /// Job id or slug
        id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,job_discovery=info,jobs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = BoardConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(site_url) = cli.site_url {
        config.site_url = site_url;
    }
    if let Some(token) = cli.token {
        config.auth_token = Some(token);
    }
    let ctx = AppContext::new(config, cli.quiet)?;

    match cli.command {
        Some(Commands::Browse(args)) => cmd::browse::run(&ctx, args).await,
        Some(Commands::Search(args)) => cmd::search::run(&ctx, args).await,
        Some(Commands::Category(args)) => cmd::category::run(&ctx, args).await,
        Some(Commands::Show { id }) => cmd::show::run(&ctx, &id).await,
        Some(Commands::Apply { id }) => {
            let job = ctx
                .catalog
                .job_details(&job_discovery::JobId::new(id))
                .await?;
            cmd::apply::run(&ctx, job).await
        }
        None => cmd::browse::run(&ctx, SearchArgs::default()).await,
    }
}
