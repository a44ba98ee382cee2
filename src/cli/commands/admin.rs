use clap::Subcommand;
use serde_json::json;

use crate::auth::Role;
use crate::cli::commands::dashboard::{comment_line, objective_line};
use crate::cli::utils::{output_alert, output_collection, output_empty_collection, output_success};
use crate::cli::{AppContext, OutputFormat};
use crate::models::User;
use crate::screens::{AdminTabs, Alert, ObjectivesTrackingTab, Route};

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "User management and objective assignment")]
    Users {
        #[command(subcommand)]
        cmd: UserCommands,
    },

    #[command(about = "Follow the objectives of a consultant")]
    Tracking {
        #[command(subcommand)]
        cmd: TrackingCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List all users")]
    List,

    #[command(about = "Create a user")]
    Add {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long, default_value = "CONSULTANT", help = "Role (CONSULTANT or ADMIN)")]
        role: String,
    },

    #[command(about = "Delete a user")]
    Delete {
        #[arg(help = "User ID")]
        id: i64,
    },

    #[command(about = "Assign one objective to several users")]
    Assign {
        #[arg(help = "Objective description")]
        description: String,
        #[arg(long = "user", help = "User ID (repeat for several users)")]
        users: Vec<i64>,
        #[arg(long, help = "Year (defaults to the current year)")]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum TrackingCommands {
    #[command(about = "List consultants")]
    Consultants,

    #[command(about = "List the objectives of a consultant")]
    Objectives {
        #[arg(help = "Consultant user ID")]
        user_id: i64,
        #[arg(long, help = "Year (defaults to the current year)")]
        year: Option<i32>,
    },

    #[command(about = "Show the comments of an objective")]
    Comments {
        #[arg(help = "Consultant user ID")]
        user_id: i64,
        #[arg(help = "Objective ID")]
        objective_id: i64,
        #[arg(long)]
        year: Option<i32>,
    },

    #[command(about = "Comment on an objective")]
    Comment {
        #[arg(help = "Consultant user ID")]
        user_id: i64,
        #[arg(help = "Objective ID")]
        objective_id: i64,
        #[arg(help = "Comment text")]
        text: String,
        #[arg(long)]
        year: Option<i32>,
    },

    #[command(about = "Rewrite a comment")]
    EditComment {
        #[arg(help = "Consultant user ID")]
        user_id: i64,
        #[arg(help = "Objective ID")]
        objective_id: i64,
        #[arg(help = "Comment ID")]
        comment_id: i64,
        #[arg(help = "New comment text")]
        text: String,
        #[arg(long)]
        year: Option<i32>,
    },

    #[command(about = "Delete a comment")]
    DeleteComment {
        #[arg(help = "Consultant user ID")]
        user_id: i64,
        #[arg(help = "Objective ID")]
        objective_id: i64,
        #[arg(help = "Comment ID")]
        comment_id: i64,
        #[arg(long)]
        year: Option<i32>,
    },

    #[command(about = "Validate an achieved objective")]
    Validate {
        #[arg(help = "Consultant user ID")]
        user_id: i64,
        #[arg(help = "Objective ID")]
        objective_id: i64,
        #[arg(long)]
        year: Option<i32>,
    },
}

fn user_line(user: &User) -> String {
    format!("#{:<5} {:<24} {}", user.id, user.username, user.role_label())
}

pub async fn handle(cmd: AdminCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    ctx.resume_at(Route::AdminTabs)?;
    let mut tabs = AdminTabs::new(ctx.api.clone());

    match cmd {
        AdminCommands::Users { cmd } => handle_users(cmd, &mut tabs, output_format).await,
        AdminCommands::Tracking { cmd } => handle_tracking(cmd, &mut tabs, output_format).await,
    }
}

async fn handle_users(cmd: UserCommands, tabs: &mut AdminTabs, output_format: OutputFormat) -> anyhow::Result<()> {
    let tab = &mut tabs.users;

    match cmd {
        UserCommands::List => {
            tab.fetch_users().await;
            fail_on_alert(tab.alert())?;
            if tab.users().is_empty() {
                return output_empty_collection(&output_format, "users", "No users");
            }
            output_collection(&output_format, "users", tab.users(), user_line)
        }
        UserCommands::Add { username, password, role } => {
            tab.new_user.username = username;
            tab.new_user.password = password;
            tab.new_user.role = Role::from_wire(&role);
            tab.add_user().await;
            output_alert(&output_format, tab.alert(), "User created", None)
        }
        UserCommands::Delete { id } => {
            tab.delete_user(id).await;
            output_alert(&output_format, tab.alert(), "User deleted", Some(json!({ "id": id })))
        }
        UserCommands::Assign { description, users, year } => {
            tab.description = description;
            if let Some(year) = year {
                tab.selected_year = year;
            }
            for id in users {
                if !tab.is_selected(id) {
                    tab.toggle_select(id);
                }
            }
            tab.assign_objective().await;
            output_alert(&output_format, tab.alert(), "Objective assigned", None)
        }
    }
}

async fn handle_tracking(cmd: TrackingCommands, tabs: &mut AdminTabs, output_format: OutputFormat) -> anyhow::Result<()> {
    let tab = &mut tabs.tracking;
    tab.fetch_users().await;
    fail_on_alert(tab.alert())?;

    match cmd {
        TrackingCommands::Consultants => {
            if tab.consultants().is_empty() {
                return output_empty_collection(&output_format, "consultants", "No consultants");
            }
            output_collection(&output_format, "consultants", tab.consultants(), user_line)
        }
        TrackingCommands::Objectives { user_id, year } => {
            select(tab, user_id, year).await?;
            if tab.objectives().is_empty() {
                return output_empty_collection(&output_format, "objectives", &tab.empty_message());
            }
            output_collection(&output_format, "objectives", tab.objectives(), objective_line)
        }
        TrackingCommands::Comments { user_id, objective_id, year } => {
            select(tab, user_id, year).await?;
            open(tab, objective_id).await?;
            let comments = tab.thread.comments();
            if comments.is_empty() {
                return output_empty_collection(&output_format, "comments", "No comments yet");
            }
            output_collection(&output_format, "comments", comments, comment_line)
        }
        TrackingCommands::Comment { user_id, objective_id, text, year } => {
            select(tab, user_id, year).await?;
            open(tab, objective_id).await?;
            tab.thread.draft = text;
            tab.add_comment().await;
            let created = tab.thread.comments().first().cloned();
            output_alert(&output_format, tab.alert(), "Comment added", Some(json!({ "comment": created })))
        }
        TrackingCommands::EditComment { user_id, objective_id, comment_id, text, year } => {
            select(tab, user_id, year).await?;
            open(tab, objective_id).await?;
            if !tab.start_editing(comment_id) {
                anyhow::bail!("Comment {} not found on objective {}", comment_id, objective_id);
            }
            tab.thread.set_edit_text(text);
            tab.update_comment().await;
            output_alert(&output_format, tab.alert(), "Comment updated", None)
        }
        TrackingCommands::DeleteComment { user_id, objective_id, comment_id, year } => {
            select(tab, user_id, year).await?;
            open(tab, objective_id).await?;
            tab.delete_comment(comment_id).await;
            output_alert(&output_format, tab.alert(), "Comment deleted", None)
        }
        TrackingCommands::Validate { user_id, objective_id, year } => {
            select(tab, user_id, year).await?;
            let Some(objective) = tab.objectives().iter().find(|o| o.id == objective_id) else {
                anyhow::bail!("Objective {} not found", objective_id);
            };
            if !objective.can_be_validated() {
                anyhow::bail!(
                    "Objective {} cannot be validated (status: {})",
                    objective_id,
                    objective.badge().label
                );
            }
            if !tab.validate_objective(objective_id).await {
                fail_on_alert(tab.alert())?;
            }
            output_success(
                &output_format,
                &format!("Objective {} validated", objective_id),
                Some(json!({ "id": objective_id })),
            )
        }
    }
}

fn fail_on_alert(alert: Option<&Alert>) -> anyhow::Result<()> {
    match alert.filter(|a| a.is_error()) {
        Some(alert) => anyhow::bail!("{}", alert.message),
        None => Ok(()),
    }
}

async fn select(
    tab: &mut ObjectivesTrackingTab,
    user_id: i64,
    year: Option<i32>,
) -> anyhow::Result<()> {
    if let Some(year) = year {
        tab.set_year(year).await;
    }
    if !tab.select_user(user_id).await {
        anyhow::bail!("User {} is not a consultant", user_id);
    }
    fail_on_alert(tab.alert())
}

async fn open(tab: &mut ObjectivesTrackingTab, objective_id: i64) -> anyhow::Result<()> {
    if !tab.open_objective(objective_id).await {
        anyhow::bail!("Objective {} not found in {}", objective_id, tab.selected_year());
    }
    fail_on_alert(tab.alert())
}
