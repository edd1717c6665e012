//! Plain-text rendering of listings and job details.

use chrono::Utc;
use colored::Colorize;

use job_discovery::{CategoryInfo, Job, ListingQuery, ListingSnapshot, ListingView};

pub fn job_line(index: usize, job: &Job) -> String {
    let mut line = format!(
        "{:>3}. {}  {} · {} · {}",
        index,
        job.title.bold(),
        job.company,
        job.location,
        job.job_type.label()
    );
    line.push_str(&format!("  {}", job.salary_display().green()));
    if job.is_archived {
        line.push_str(&format!("  {}", "[closed]".dimmed()));
    }
    if job.external_apply_url().is_some() {
        line.push_str(&format!("  {}", "[external]".blue()));
    }
    line
}

pub fn listing<Q: ListingQuery>(snapshot: &ListingSnapshot<Q>) {
    match snapshot.view {
        ListingView::Loading => println!("{}", "Loading jobs…".dimmed()),
        ListingView::Unavailable => {
            println!("{}", "Jobs are unavailable right now.".yellow())
        }
        ListingView::Empty { can_reset } => {
            println!("{}", "No jobs match your search.".yellow());
            if can_reset {
                println!("{}", "Clear the filters to see every job.".dimmed());
            }
        }
        ListingView::Results => {
            println!(
                "{}",
                format!("{} jobs found", snapshot.total).dimmed()
            );
            println!();
            for (i, job) in snapshot.jobs.iter().enumerate() {
                println!("{}", job_line(i + 1, job));
            }
            println!();
            println!("{}", pager(snapshot));
        }
    }
}

fn pager<Q: ListingQuery>(snapshot: &ListingSnapshot<Q>) -> String {
    let current = snapshot.query.page();
    let mut parts = Vec::new();
    if snapshot.controls.has_previous {
        parts.push("‹ prev".to_string());
    }
    for page in &snapshot.page_window {
        if *page == current {
            parts.push(format!("[{}]", page).bold().to_string());
        } else {
            parts.push(page.to_string());
        }
    }
    if snapshot.controls.has_next {
        parts.push("next ›".to_string());
    }
    format!("Page {} of {}   {}", current, snapshot.total_pages, parts.join(" "))
}

pub fn category_heading(info: &CategoryInfo) {
    println!("{}", info.heading().bold().underline());
    if let Some(description) = &info.meta_description {
        println!("{}", description.dimmed());
    }
}

pub fn job_details(job: &Job) {
    println!();
    println!("{}", job.title.bold().underline());
    println!("{} · {}", job.company, job.location);
    println!(
        "{} · {}",
        job.job_type.label(),
        job.salary_display().green()
    );
    if !job.categories.is_empty() {
        println!("{}", job.categories.join(", ").dimmed());
    }
    println!(
        "{}",
        format!(
            "Posted {} · {} views · {} applicants",
            job.created_at.format("%d %b %Y"),
            job.view_count,
            job.application_count
        )
        .dimmed()
    );
    if job.is_archived || job.is_expired(Utc::now()) {
        println!("{}", "This job is no longer accepting applications.".yellow());
    }
    if !job.description.trim().is_empty() {
        println!();
        println!("{}", job.description.trim());
    }
    println!();
}
