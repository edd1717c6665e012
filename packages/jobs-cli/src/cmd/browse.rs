//! Interactive job browsing

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Select};

use job_discovery::{FilterAction, JobBoard, JobType, SortBy};

use crate::cmd::{apply, search::SearchArgs};
use crate::context::AppContext;
use crate::render;

#[derive(Debug, Clone, Copy)]
enum MenuAction {
    Open,
    Next,
    Previous,
    GoTo,
    Search,
    Category,
    JobType,
    Sort,
    Clear,
    Quit,
}

pub async fn run(ctx: &AppContext, args: SearchArgs) -> Result<()> {
    let board = JobBoard::new(
        args.to_filter(),
        ctx.catalog.clone(),
        ctx.navigator.clone(),
        &ctx.config,
    );
    board.refresh().await;

    loop {
        let snapshot = board.snapshot();
        println!();
        render::listing(&snapshot);
        println!("{}", ctx.navigator.current_url().dimmed());

        let mut menu = Vec::new();
        if !snapshot.jobs.is_empty() {
            menu.push(("Open a job", MenuAction::Open));
        }
        if snapshot.controls.has_next {
            menu.push(("Next page", MenuAction::Next));
        }
        if snapshot.controls.has_previous {
            menu.push(("Previous page", MenuAction::Previous));
        }
        if snapshot.total_pages > 1 {
            menu.push(("Go to page…", MenuAction::GoTo));
        }
        menu.push(("Search", MenuAction::Search));
        menu.push(("Category", MenuAction::Category));
        menu.push(("Job type", MenuAction::JobType));
        menu.push(("Sort", MenuAction::Sort));
        if snapshot.query.has_filters() || snapshot.query.page > 1 {
            menu.push(("Clear filters", MenuAction::Clear));
        }
        menu.push(("Quit", MenuAction::Quit));

        let labels: Vec<&str> = menu.iter().map(|(label, _)| *label).collect();
        let choice = Select::with_theme(&ctx.theme())
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match menu[choice].1 {
            MenuAction::Open => {
                let titles: Vec<String> = snapshot
                    .jobs
                    .iter()
                    .map(|j| format!("{} · {}", j.title, j.company))
                    .collect();
                let picked = Select::with_theme(&ctx.theme())
                    .with_prompt("Which job?")
                    .items(&titles)
                    .default(0)
                    .interact()?;
                open_job(ctx, &snapshot.jobs[picked].id).await?;
            }
            MenuAction::Next => {
                board.next_page().await;
            }
            MenuAction::Previous => {
                board.previous_page().await;
            }
            MenuAction::GoTo => {
                let page = Input::<u32>::with_theme(&ctx.theme())
                    .with_prompt(format!("Page (1-{})", snapshot.total_pages))
                    .interact_text()?;
                if board.go_to_page(page).await.is_none() {
                    ctx.print_warning("No such page.");
                }
            }
            MenuAction::Search => {
                let term = Input::<String>::with_theme(&ctx.theme())
                    .with_prompt("Search")
                    .with_initial_text(snapshot.query.search_term.clone())
                    .allow_empty(true)
                    .interact_text()?;
                board.dispatch(FilterAction::SubmitSearch(term)).await;
            }
            MenuAction::Category => {
                let category = Input::<String>::with_theme(&ctx.theme())
                    .with_prompt("Category (blank for all)")
                    .with_initial_text(snapshot.query.category.clone().unwrap_or_default())
                    .allow_empty(true)
                    .interact_text()?;
                board
                    .dispatch(FilterAction::SetCategory(Some(category)))
                    .await;
            }
            MenuAction::JobType => {
                let mut labels = vec!["All types"];
                labels.extend(JobType::variants().iter().map(|t| t.label()));
                let picked = Select::with_theme(&ctx.theme())
                    .with_prompt("Job type")
                    .items(&labels)
                    .default(0)
                    .interact()?;
                let job_type = picked
                    .checked_sub(1)
                    .map(|i| JobType::variants()[i]);
                board.dispatch(FilterAction::SetJobType(job_type)).await;
            }
            MenuAction::Sort => {
                let labels: Vec<&str> = SortBy::variants().iter().map(|s| s.label()).collect();
                let current = SortBy::variants()
                    .iter()
                    .position(|s| *s == snapshot.query.sort_by)
                    .unwrap_or(0);
                let picked = Select::with_theme(&ctx.theme())
                    .with_prompt("Sort by")
                    .items(&labels)
                    .default(current)
                    .interact()?;
                board
                    .dispatch(FilterAction::SetSortBy(SortBy::variants()[picked]))
                    .await;
            }
            MenuAction::Clear => {
                board.clear_filters().await;
            }
            MenuAction::Quit => return Ok(()),
        }
    }
}

async fn open_job(ctx: &AppContext, id: &job_discovery::JobId) -> Result<()> {
    let job = match ctx.catalog.job_details(id).await {
        Ok(job) => job,
        Err(e) => {
            ctx.print_warning(&format!("Couldn't load this job: {}", e));
            return Ok(());
        }
    };
    render::job_details(&job);

    if job.is_archived {
        return Ok(());
    }
    if ctx.confirm("Apply for this job?", false)? {
        apply::run(ctx, job).await?;
    }
    Ok(())
}
