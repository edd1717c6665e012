//! Apply flow: direct application for signed-in users, lead capture otherwise

use anyhow::Result;
use dialoguer::{Input, Select};

use job_discovery::{
    Application, ApplicationGate, DiscoveryError, ExperienceBand, GateOutcome, GateState, Job,
    LeadField, LeadForm,
};

use crate::context::AppContext;

pub async fn run(ctx: &AppContext, job: Job) -> Result<()> {
    let mut gate = ApplicationGate::new(job, ctx.session.clone(), ctx.gate_deps());

    if gate.is_applied() {
        ctx.print_info("You have already applied for this job.");
        return Ok(());
    }

    let application = if ctx.session.is_authenticated() {
        cover_letter(ctx)?
    } else {
        Application::default()
    };

    loop {
        let result = match gate.state() {
            GateState::Terminal(GateOutcome::Failed { .. }) => gate.retry().await,
            _ => gate.apply(application.clone()).await,
        };
        match result {
            Ok(()) => break,
            // Already notified; the server's answer is final
            Err(e) if e.is_business() => return Ok(()),
            Err(e) => {
                if !ctx.confirm("Try again?", true)? {
                    return Err(e.into());
                }
            }
        }
    }

    if gate.state() == &GateState::LeadCapturing {
        capture_lead(ctx, &mut gate).await?;
    }
    Ok(())
}

fn cover_letter(ctx: &AppContext) -> Result<Application> {
    let text = Input::<String>::with_theme(&ctx.theme())
        .with_prompt("Cover letter (optional)")
        .allow_empty(true)
        .interact_text()?;
    let text = text.trim();
    Ok(Application {
        cover_letter: (!text.is_empty()).then(|| text.to_string()),
    })
}

async fn capture_lead(ctx: &AppContext, gate: &mut ApplicationGate) -> Result<()> {
    ctx.print_header(&format!(
        "Interested in {} at {}?",
        gate.job().title,
        gate.job().company
    ));
    ctx.print_info("Leave your details and we'll take you to the next step.");

    let mut form = LeadForm::new();
    let mut fields: Vec<LeadField> = LeadField::all().to_vec();

    loop {
        for field in &fields {
            let value = prompt_field(ctx, &form, *field)?;
            form.set(*field, value);
        }

        match gate.submit_lead(&mut form).await {
            Ok(()) => return Ok(()),
            Err(DiscoveryError::Validation(errors)) => {
                // Only the offending fields are asked again
                fields = errors.fields();
            }
            Err(_) => {
                if let Some(reason) = gate.lead_error() {
                    ctx.print_warning(reason);
                }
                gate.dismiss_error();
                if !ctx.confirm("Send again?", true)? {
                    gate.cancel();
                    return Ok(());
                }
                fields.clear();
            }
        }
    }
}

fn prompt_field(ctx: &AppContext, form: &LeadForm, field: LeadField) -> Result<String> {
    if let Some(error) = form.error(field) {
        ctx.print_warning(error);
    }

    if field == LeadField::ExperienceYears {
        let bands = ExperienceBand::variants();
        let labels: Vec<&str> = bands.iter().map(|b| b.label()).collect();
        let current = bands
            .iter()
            .position(|b| b.as_str() == form.value(field))
            .unwrap_or(0);
        let choice = Select::with_theme(&ctx.theme())
            .with_prompt(field.label())
            .items(&labels)
            .default(current)
            .interact()?;
        return Ok(bands[choice].as_str().to_string());
    }

    let prompt = if field.is_required() {
        field.label().to_string()
    } else {
        format!("{} (optional)", field.label())
    };
    Ok(Input::<String>::with_theme(&ctx.theme())
        .with_prompt(prompt)
        .with_initial_text(form.value(field))
        .allow_empty(!field.is_required())
        .interact_text()?)
}
