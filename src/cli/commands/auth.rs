use anyhow::Context as _;
use clap::Subcommand;
use serde_json::json;

use crate::auth::{decode_claims, landing_route};
use crate::cli::utils::output_success;
use crate::cli::{AppContext, OutputFormat};
use crate::screens::LoginScreen;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and print the token plus the landing screen")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, env = "OBJECTIVE_PASSWORD", hide_env_values = true, help = "Password")]
        password: Option<String>,
    },

    #[command(about = "Decode the current token locally and show who it belongs to")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let mut screen = LoginScreen::new(ctx.api.clone(), ctx.session.clone());
            screen.username = username;
            screen.password = password.unwrap_or_default();

            let Some(route) = screen.submit().await else {
                anyhow::bail!("{}", screen.error().unwrap_or("Login failed"));
            };

            let token = ctx.session.token().context("Session lost right after sign-in")?;
            let role = ctx.session.role();
            let role_label = role.as_ref().map(|r| r.as_str()).unwrap_or("-");

            output_success(
                &output_format,
                &format!("Logged in as {} ({}), landing on {}", screen.username, role_label, route.name()),
                Some(json!({
                    "token": token,
                    "role": role,
                    "route": route,
                })),
            )?;

            if matches!(output_format, OutputFormat::Text) {
                println!("export OBJECTIVE_TOKEN={}", token);
            }
            Ok(())
        }
        AuthCommands::Whoami => {
            let token = ctx
                .token
                .as_deref()
                .context("Not signed in: pass --token or set OBJECTIVE_TOKEN")?;
            let claims = decode_claims(token)?;
            let route = landing_route(&claims);

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "claims": claims,
                            "route": route,
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!("User: {}", claims.subject().unwrap_or("-"));
                    println!("Role: {}", claims.role().unwrap_or("-"));
                    println!("Landing: {}", route.name());
                }
            }
            Ok(())
        }
    }
}
