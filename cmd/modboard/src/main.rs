//! # modboard
//!
//! Operator CLI for the moderation backend: submit entries, inspect the
//! stores, and run (cascading) deletions.

mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use configs::{LoggingSettings, Settings};
use domains::{EntryId, Submission};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::App;

#[derive(Parser, Debug)]
#[command(name = "modboard")]
#[command(about = "Moderation backend for a threaded text forum")]
#[command(version)]
struct Args {
    /// Path to a TOML config file (defaults to ./modboard.toml when present)
    #[arg(short, long, env = "MODBOARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a new entry or reply
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Id of the entry being replied to
        #[arg(long)]
        parent_id: Option<String>,
    },
    /// Print entries and the tag index
    Show,
    /// Print moderation records
    Logs {
        /// Only records that were flagged
        #[arg(long)]
        flagged: bool,
    },
    /// Delete an entry and, unless --no-cascade, all its replies
    Delete {
        id: String,
        #[arg(long)]
        no_cascade: bool,
    },
    /// Delete every entry created strictly before an ISO-8601 cutoff
    DeleteBefore {
        cutoff: String,
        #[arg(long)]
        no_cascade: bool,
    },
}

fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;
    init_tracing(&settings.logging);

    info!(data_dir = %settings.storage.data_dir.display(), "starting modboard");
    let app = App::build(&settings)?;

    match args.command {
        Command::Submit {
            title,
            text,
            tags,
            parent_id,
        } => {
            let receipt = app
                .submissions
                .submit(Submission {
                    title,
                    text,
                    tags,
                    parent_id,
                })
                .await?;
            print_json(&receipt)?;
        }
        Command::Show => print_json(&app.entries.snapshot().await)?,
        Command::Logs { flagged } => {
            let records: Vec<_> = app
                .log
                .records()
                .await
                .into_iter()
                .filter(|r| !flagged || r.flagged)
                .collect();
            print_json(&records)?;
        }
        Command::Delete { id, no_cascade } => {
            let report = app.deletions.delete(&EntryId::from(id), !no_cascade).await;
            print_json(&report)?;
        }
        Command::DeleteBefore { cutoff, no_cascade } => {
            let report = app.deletions.delete_before(&cutoff, !no_cascade).await?;
            print_json(&report)?;
        }
    }

    Ok(())
}
