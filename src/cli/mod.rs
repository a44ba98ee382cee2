pub mod commands;
pub mod utils;

use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, BackendApi};
use crate::auth::{landing_route, TokenError};
use crate::config::{config, AppConfig};
use crate::error::ClientError;
use crate::screens::{Navigator, Route};
use crate::session::Session;

#[derive(Parser)]
#[command(name = "objective")]
#[command(about = "Objective tracker CLI - consultant objectives and admin follow-up")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Backend base URL (overrides OBJECTIVE_API_URL)")]
    pub api_url: Option<String>,

    #[arg(
        long,
        global = true,
        env = "OBJECTIVE_TOKEN",
        hide_env_values = true,
        help = "Bearer token returned by `auth login`"
    )]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Login and token inspection")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Consultant dashboard: own objectives and comments")]
    Dashboard {
        #[command(subcommand)]
        cmd: commands::dashboard::DashboardCommands,
    },

    #[command(about = "Administration: users, assignments and objectives tracking")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command handler needs: one session, one client sharing it,
/// and the token handed over on the command line.
pub struct AppContext {
    pub config: AppConfig,
    pub session: Session,
    pub api: Arc<dyn BackendApi>,
    token: Option<String>,
}

impl AppContext {
    pub fn new(config: AppConfig, token: Option<String>) -> anyhow::Result<Self> {
        let session = Session::new();
        let client = ApiClient::new(&config, session.clone())?;
        Ok(Self {
            config,
            session,
            api: Arc::new(client),
            token,
        })
    }

    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let mut app_config = config().clone();
        if let Some(url) = &cli.api_url {
            app_config = app_config.with_base_url(url);
        }
        Self::new(app_config, cli.token.clone())
    }

    /// Sign the session in with the supplied token and land where the role
    /// routes to, as the app does right after login.
    pub fn resume(&self) -> anyhow::Result<Navigator> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .context("Not signed in: pass --token or set OBJECTIVE_TOKEN")?;
        self.session.sign_in(token)?;

        let claims = self
            .session
            .claims()
            .context("Session lost right after sign-in")?;

        let mut nav = Navigator::new(self.session.clone());
        nav.navigate(landing_route(&claims));
        Ok(nav)
    }

    /// Like [`resume`](Self::resume), but fails unless the role lands on `route`
    pub fn resume_at(&self, route: Route) -> anyhow::Result<Navigator> {
        let nav = self.resume()?;
        if nav.current() != route {
            anyhow::bail!(
                "This command needs the {} screen, but this account lands on {}",
                route.name(),
                nav.current().name()
            );
        }
        Ok(nav)
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = AppContext::from_cli(&cli)?;
    tracing::debug!("using backend {}", ctx.config.api.base_url);

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx, output_format.clone()).await,
        Commands::Dashboard { cmd } => commands::dashboard::handle(cmd, &ctx, output_format.clone()).await,
        Commands::Admin { cmd } => commands::admin::handle(cmd, &ctx, output_format.clone()).await,
    };

    // JSON consumers get the failure on stdout as well
    if let (Err(e), OutputFormat::Json) = (&result, &output_format) {
        let code = if e.downcast_ref::<TokenError>().is_some() {
            Some("MALFORMED_TOKEN")
        } else {
            e.downcast_ref::<ClientError>().map(ClientError::error_code)
        };
        utils::output_error(&output_format, &e.to_string(), code)?;
    }
    result
}
