//! Job detail view

use anyhow::Result;

use job_discovery::JobId;

use crate::cmd::apply;
use crate::context::AppContext;
use crate::render;

pub async fn run(ctx: &AppContext, id: &str) -> Result<()> {
    let job = ctx.catalog.job_details(&JobId::new(id)).await?;
    render::job_details(&job);

    if !job.is_archived && ctx.confirm("Apply for this job?", false)? {
        apply::run(ctx, job).await?;
    }
    Ok(())
}
