//! Greta command-line companion
//!
//! Connects a Google Calendar through the bridge server and schedules
//! sustainability reminders with the cached tokens.

mod api;
mod app;

use anyhow::{Context, Result};
use app::App;
use calendar::templates::TEMPLATES;
use calendar::Reminder;
use chrono::DateTime;
use clap::{Parser, Subcommand, ValueEnum};
use common::config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "greta", version, about)]
struct Cli {
    /// TOML config file
    #[arg(long, env = "GRETA_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Bridge server URL (overrides config)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the Google consent flow in the browser
    Connect,
    /// Finish connecting with the URL Google redirected you to
    Complete { redirect_url: String },
    /// Show whether a calendar is connected
    Status,
    /// Forget the cached tokens
    Disconnect,
    /// Create a recurring impact reminder
    Remind {
        #[arg(value_enum)]
        kind: ReminderKind,
    },
    /// Schedule a sustainability activity from a template
    Schedule {
        /// Template name (see `greta templates`)
        template: String,
        /// Start time, RFC 3339 (e.g. 2025-03-03T09:00:00+02:00)
        #[arg(long)]
        start: String,
    },
    /// List available activity templates
    Templates,
    /// List tracked events from the last and next 30 days
    Events,
    /// Show or answer the ad consent prompt
    Consent {
        #[arg(value_enum, default_value = "show")]
        action: ConsentAction,
    },
    /// Check whether an ad slot would render for a page
    Ads {
        /// File holding the page's text content
        page: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReminderKind {
    Weekly,
    Daily,
}

impl From<ReminderKind> for Reminder {
    fn from(kind: ReminderKind) -> Self {
        match kind {
            ReminderKind::Weekly => Reminder::Weekly,
            ReminderKind::Daily => Reminder::Daily,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConsentAction {
    Show,
    Allow,
    Deny,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        config.client.api_url = api_url;
    }

    let app = App::new(&config)?;

    match cli.command {
        Command::Connect => app.connect().await?,
        Command::Complete { redirect_url } => {
            app.complete(&redirect_url)?;
            println!("Calendar connected.");
        }
        Command::Status => {
            if app.is_connected() {
                println!("Calendar connected.");
            } else {
                println!("Calendar not connected.");
            }
        }
        Command::Disconnect => {
            if app.disconnect()? {
                println!("Calendar tokens removed.");
            } else {
                println!("No calendar tokens were stored.");
            }
        }
        Command::Remind { kind } => {
            let link = app.create_reminder(kind.into()).await?;
            println!("Reminder created: {}", link);
        }
        Command::Schedule { template, start } => {
            let start = DateTime::parse_from_rfc3339(&start)
                .with_context(|| format!("Invalid start time: {}", start))?;
            let link = app.schedule(&template, start).await?;
            println!("Event created: {}", link);
        }
        Command::Templates => {
            for template in TEMPLATES {
                println!(
                    "{:<32} {:>4} min  {}",
                    template.key, template.duration_minutes, template.sdg_category
                );
            }
        }
        Command::Events => {
            let events = app.list_events().await?;
            if events.is_empty() {
                println!("No tracked events in the last or next 30 days.");
            }
            for event in events {
                println!(
                    "{}  {}",
                    event.start,
                    event.title.as_deref().unwrap_or("(untitled)")
                );
            }
        }
        Command::Consent { action } => match action {
            ConsentAction::Show => match app.consent() {
                Some(true) => println!("Ads allowed."),
                Some(false) => println!("Ads declined."),
                None => println!("Not answered yet."),
            },
            ConsentAction::Allow => app.set_consent(true)?,
            ConsentAction::Deny => app.set_consent(false)?,
        },
        Command::Ads { page } => {
            let content = std::fs::read_to_string(&page)
                .with_context(|| format!("Failed to read {}", page.display()))?;
            if app.ads_visible(&content) {
                println!("Ad slot shown.");
            } else {
                println!("Ad slot hidden.");
            }
        }
    }

    Ok(())
}
