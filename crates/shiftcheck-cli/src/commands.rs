//! Command implementations. Each one drives the core the way a screen of
//! the mobile app would.

use std::io::{self, Write};

use anyhow::{bail, Result};
use tracing::warn;

use shiftcheck_core::auth::SessionError;
use shiftcheck_core::utils::truncate_string;
use shiftcheck_core::workflow::{HandoverWorkflow, PendingSamplesWorkflow};

use crate::{AppContext, Command};

/// Width of the exam column in the samples table
const EXAM_COLUMN_WIDTH: usize = 28;

pub async fn run(ctx: &mut AppContext, command: Command) -> Result<()> {
    match command {
        Command::Login { username } => login(ctx, username).await,
        Command::Logout => {
            ctx.session.logout();
            println!("Logged out.");
            Ok(())
        }
        Command::WhoAmI => {
            match ctx.session.current_user() {
                Some(user) => println!("{} - {}", user.display_name(), user.role),
                None => println!("Not logged in."),
            }
            Ok(())
        }
        Command::Samples => samples(ctx).await,
        Command::Shifts => {
            require_login(ctx)?;
            let shifts = ctx.api.list_shifts().await;
            if shifts.is_empty() {
                println!("No shifts found.");
            }
            for shift in shifts {
                let active = if shift.is_active { "" } else { " (inactive)" };
                println!("{:>4}  {:<16} {}{}", shift.id, shift.name, shift.time_range(), active);
            }
            Ok(())
        }
        Command::Users => {
            require_login(ctx)?;
            for user in ctx.api.list_active_users().await {
                println!("{:>4}  {:<32} {}", user.id, user.display_name(), user.role);
            }
            Ok(())
        }
        Command::Handovers { from, to } => {
            require_login(ctx)?;
            let handovers = ctx.api.list_handovers(from, to).await;
            if handovers.is_empty() {
                println!("No handovers found.");
            }
            for h in handovers {
                println!(
                    "{:>5}  {:<20} {:<12} {:<20} {} sample(s)",
                    h.id,
                    h.date_display(),
                    h.shift_name,
                    h.user_name,
                    h.pending_samples_count
                );
                if let Some(notes) = h.notes.as_deref().filter(|n| !n.is_empty()) {
                    println!("       {}", notes);
                }
            }
            Ok(())
        }
        Command::Handover {
            sample_ids,
            shift_id,
            notes,
        } => handover(ctx, &sample_ids, shift_id, notes).await,
        Command::Help => Ok(()),
    }
}

fn require_login(ctx: &AppContext) -> Result<()> {
    if !ctx.session.is_authenticated() {
        bail!("Not logged in. Run `shiftcheck login` first.");
    }
    Ok(())
}

fn prompt_username(default: Option<&str>) -> Result<String> {
    match default {
        Some(last) => print!("Username [{}]: ", last),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match default {
        Some(last) if input.is_empty() => last.to_string(),
        _ => input.to_string(),
    })
}

async fn login(ctx: &mut AppContext, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => prompt_username(ctx.config.last_username.as_deref())?,
    };
    let password = rpassword::prompt_password("Password: ")?;

    println!("\nAuthenticating...");
    match ctx.session.login(&username, &password).await {
        Ok(Some(user)) => {
            ctx.config.last_username = Some(user.username.clone());
            if let Err(e) = ctx.config.save() {
                warn!(error = %e, "Failed to save config");
            }
            println!("Welcome, {}.", user.full_name);
            Ok(())
        }
        Ok(None) => bail!("Invalid username or password"),
        Err(SessionError::Transport { message, .. }) => bail!("Connection error: {}", message),
        Err(e) => Err(e.into()),
    }
}

async fn samples(ctx: &AppContext) -> Result<()> {
    require_login(ctx)?;
    let mut listing =
        PendingSamplesWorkflow::new(ctx.api.clone(), ctx.session.clone(), ctx.selection.clone());
    listing.initialize().await?;

    println!("Pending samples for {}\n", listing.current_user_name());
    if listing.samples().is_empty() {
        println!("No pending samples.");
        return Ok(());
    }
    for sample in listing.samples() {
        println!(
            "{:>6}  {:<8} {:<width$} {:<10} {}",
            sample.id,
            sample.folio_display(),
            truncate_string(sample.exam_display(), EXAM_COLUMN_WIDTH),
            sample.priority.as_deref().unwrap_or("-"),
            sample.received_display(),
            width = EXAM_COLUMN_WIDTH
        );
    }
    Ok(())
}

async fn handover(
    ctx: &AppContext,
    sample_ids: &[i64],
    shift_id: Option<i64>,
    notes: String,
) -> Result<()> {
    require_login(ctx)?;

    let mut listing =
        PendingSamplesWorkflow::new(ctx.api.clone(), ctx.session.clone(), ctx.selection.clone());
    listing.initialize().await?;
    for id in sample_ids {
        if !listing.is_selected(*id) {
            listing.toggle(*id)?;
        }
    }
    listing.begin_handover()?;

    let mut workflow =
        HandoverWorkflow::new(ctx.api.clone(), ctx.session.clone(), ctx.selection.clone());
    workflow.initialize().await?;
    if let Some(id) = shift_id {
        workflow.select_shift(id)?;
    }
    workflow.set_notes(notes);

    let shift_name = workflow
        .selected_shift()
        .map(|s| s.name.clone())
        .unwrap_or_default();
    println!(
        "Handing over {} sample(s) to shift {}...",
        listing.selected_count(),
        shift_name
    );

    let record = workflow.submit().await?;
    println!(
        "Handover {} created ({} sample(s), {}).",
        record.id,
        record.pending_samples_count,
        record.date_display()
    );
    Ok(())
}
