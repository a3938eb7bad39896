use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpItemSource, TriageSession, ViewModel};
use shared::domain::Priority;
use storage::{OverrideStore, Storage};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, Overrides, Settings};
use render::{render_overrides, render_view};

/// Groups classified emails by category and priority, with local priority corrections.
#[derive(Parser, Debug)]
#[command(name = "triage", version)]
struct Cli {
    /// Config file (defaults to ./triage.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Where priority overrides are kept.
    #[arg(long, global = true)]
    database_url: Option<String>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch emails and print them grouped by category.
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Correct the priority of one email and print the regrouped result.
    Edit {
        identity: String,
        priority: Priority,
        #[arg(long)]
        json: bool,
    },
    /// Inspect or drop stored corrections.
    Overrides {
        #[command(subcommand)]
        action: OverridesAction,
    },
}

#[derive(Subcommand, Debug)]
enum OverridesAction {
    List,
    Clear { identity: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = load_settings(
        cli.config.as_deref(),
        Overrides {
            server_url: cli.server_url,
            database_url: cli.database_url,
            timeout_secs: cli.timeout_secs,
        },
    );
    info!(
        server_url = %settings.server_url,
        database_url = %settings.database_url,
        "triage: settings loaded"
    );
    let storage = Storage::new(&settings.database_url).await?;

    match cli.command {
        Command::Show { json } => {
            let mut session = TriageSession::new(Arc::new(storage));
            let view = load(&mut session, &settings).await?;
            print_view(&view, json)?;
        }
        Command::Edit {
            identity,
            priority,
            json,
        } => {
            let mut session = TriageSession::new(Arc::new(storage));
            load(&mut session, &settings).await?;
            let position = session
                .position_of(&identity)
                .ok_or_else(|| anyhow!("no loaded email has identity '{identity}'"))?;
            let view = session
                .on_priority_edit(position, priority)
                .await
                .ok_or_else(|| anyhow!("email '{identity}' disappeared from the session"))?;
            print_view(&view, json)?;
        }
        Command::Overrides { action } => match action {
            OverridesAction::List => {
                print!("{}", render_overrides(&storage.list_overrides().await?));
            }
            OverridesAction::Clear { identity } => {
                if storage.clear(&identity).await? {
                    println!("cleared override for '{identity}'");
                } else {
                    println!("no override stored for '{identity}'");
                }
            }
        },
    }

    Ok(())
}

async fn load(session: &mut TriageSession, settings: &Settings) -> Result<ViewModel> {
    let source = HttpItemSource::with_timeout(&settings.server_url, settings.timeout);
    match session.load(&source).await {
        Ok(view) => Ok(view),
        Err(err) => bail!("{}", err.user_message()),
    }
}

fn print_view(view: &ViewModel, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", render_view(view));
    }
    Ok(())
}
