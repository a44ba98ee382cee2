use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_alert, output_collection, output_empty_collection};
use crate::cli::{AppContext, OutputFormat};
use crate::models::{Comment, Objective};
use crate::screens::{current_year, DashboardScreen, Route};

#[derive(Subcommand)]
pub enum DashboardCommands {
    #[command(about = "List your objectives for a year")]
    List {
        #[arg(long, help = "Year (defaults to the current year)")]
        year: Option<i32>,
    },

    #[command(about = "Show the comments of one of your objectives")]
    Comments {
        #[arg(help = "Objective ID")]
        objective_id: i64,
        #[arg(long, help = "Year of the objective (defaults to the current year)")]
        year: Option<i32>,
    },

    #[command(about = "Comment on one of your objectives")]
    Comment {
        #[arg(help = "Objective ID")]
        objective_id: i64,
        #[arg(help = "Comment text")]
        text: String,
        #[arg(long, help = "Year of the objective (defaults to the current year)")]
        year: Option<i32>,
    },
}

pub fn objective_line(objective: &Objective) -> String {
    format!(
        "#{:<5} [{}] {} ({})",
        objective.id,
        objective.badge().label,
        objective.description(),
        objective.created_on()
    )
}

pub fn comment_line(comment: &Comment) -> String {
    format!(
        "#{:<5} {} - {}: {}",
        comment.id,
        comment.created_on(),
        comment.author_label(),
        comment.text()
    )
}

pub async fn handle(cmd: DashboardCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    ctx.resume_at(Route::Dashboard)?;

    match cmd {
        DashboardCommands::List { year } => {
            let screen = load(ctx, year).await?;
            if screen.is_empty_state() {
                return output_empty_collection(&output_format, "objectives", &screen.empty_message());
            }
            output_collection(&output_format, "objectives", screen.objectives(), objective_line)
        }
        DashboardCommands::Comments { objective_id, year } => {
            let mut screen = load(ctx, year).await?;
            open(&mut screen, objective_id).await?;
            let comments = screen.thread.comments();
            if comments.is_empty() {
                return output_empty_collection(&output_format, "comments", "No comments yet");
            }
            output_collection(&output_format, "comments", comments, comment_line)
        }
        DashboardCommands::Comment { objective_id, text, year } => {
            let mut screen = load(ctx, year).await?;
            open(&mut screen, objective_id).await?;
            screen.thread.draft = text;
            screen.add_comment().await;

            let created = screen.thread.comments().first().cloned();
            output_alert(
                &output_format,
                screen.alert(),
                "Comment added",
                Some(json!({ "comment": created })),
            )
        }
    }
}

async fn load(ctx: &AppContext, year: Option<i32>) -> anyhow::Result<DashboardScreen> {
    let mut screen = DashboardScreen::with_year(ctx.api.clone(), year.unwrap_or_else(current_year));
    screen.fetch_objectives().await;
    if let Some(error) = screen.error() {
        anyhow::bail!("{}", error);
    }
    Ok(screen)
}

async fn open(screen: &mut DashboardScreen, objective_id: i64) -> anyhow::Result<()> {
    if !screen.open_objective(objective_id).await {
        anyhow::bail!("Objective {} not found in {}", objective_id, screen.selected_year());
    }
    if let Some(alert) = screen.alert().filter(|a| a.is_error()) {
        anyhow::bail!("{}", alert.message);
    }
    Ok(())
}
