//! issuesync - GitHub Issues to standard task synchronization
//!
//! Main entry point for the issuesync CLI.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use futures::{pin_mut, StreamExt};
use issuesync::config::{validate_config, ConnectorConfig, TOKEN_ENV_VAR};
use issuesync::sync::{GitHubConnector, PollStats, SyncCursor};
use issuesync::{ChangeSet, StandardTask, SyncError, TaskStatus};
use std::path::PathBuf;
use std::process;

/// issuesync - Sync GitHub issues into standard tasks
#[derive(Parser, Debug)]
#[command(name = "issuesync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/issuesync/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show one task by id (owner/repo/number)
    Get {
        /// Issue id, e.g. octo/hello-world/42
        id: String,
    },

    /// Push changes to a task
    Update {
        /// Issue id, e.g. octo/hello-world/42
        id: String,

        /// New title
        #[arg(long)]
        name: Option<String>,

        /// New description (replaces the whole issue body)
        #[arg(long)]
        description: Option<String>,

        /// Clear the description
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,

        /// New status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Poll configured repositories for changed tasks
    Poll {
        /// Only tasks updated since this ISO-8601 timestamp (cursor)
        #[arg(long)]
        since: Option<String>,

        /// Poll these repositories instead of the configured ones
        #[arg(short, long = "repo")]
        repos: Vec<String>,
    },

    /// Check the configuration file
    Validate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Done,
    NotDone,
}

impl From<StatusArg> for TaskStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Done => TaskStatus::Done,
            StatusArg::NotDone => TaskStatus::NotDone,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = issuesync::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ConnectorConfig> {
    let result = match path {
        Some(path) => ConnectorConfig::load(path),
        None => ConnectorConfig::load_default(),
    };
    match result {
        Ok(config) => Ok(config),
        Err(e @ SyncError::ConfigNotFound(_)) => {
            tracing::debug!("{}", e);
            // Token from the environment and repositories from --repo still work
            Ok(ConnectorConfig::new())
        }
        Err(e) => Err(e).context("Failed to load configuration"),
    }
}

fn print_task(task: &StandardTask) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(task)?);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config(cli.config)?;

    if let Commands::Validate = cli.command {
        return match validate_config(&config, std::env::var(TOKEN_ENV_VAR).ok()) {
            Ok(()) => {
                println!("Configuration OK ({} repositories)", config.repositories.len());
                Ok(())
            }
            Err(errors) => {
                for error in &errors {
                    eprintln!("  {}", error);
                }
                bail!("{} configuration error(s)", errors.len())
            }
        };
    }

    if let Commands::Poll { ref repos, .. } = cli.command {
        if !repos.is_empty() {
            config.repositories = repos.clone();
        }
    }

    let connector = GitHubConnector::from_config(&config)?;
    let result = execute(&connector, cli.command).await;
    connector.close().await;
    result
}

async fn execute(connector: &GitHubConnector, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Get { id } => match connector.get_task(&id).await? {
            Some(task) => print_task(&task)?,
            None => bail!("Task {} not found", id),
        },

        Commands::Update {
            id,
            name,
            description,
            clear_description,
            status,
        } => {
            let mut changes = ChangeSet::new();
            if let Some(name) = name {
                changes = changes.with_name(name);
            }
            if clear_description {
                changes = changes.with_description(None);
            } else if let Some(description) = description {
                changes = changes.with_description(Some(description));
            }
            if let Some(status) = status {
                changes = changes.with_status(status.into());
            }

            let task = connector
                .update_task(&id, &changes)
                .await
                .with_context(|| format!("Failed to update {}", id))?;
            print_task(&task)?;
        }

        Commands::Poll { since, .. } => {
            let cursor = since.map(SyncCursor::new);
            let next_cursor = SyncCursor::now();
            let mut stats = PollStats::default();

            let outcomes = connector.poll_outcomes(cursor.as_ref());
            pin_mut!(outcomes);
            while let Some(outcome) = outcomes.next().await {
                stats.record(&outcome);
                if let Some(task) = outcome.into_task() {
                    print_task(&task)?;
                }
            }

            eprintln!(
                "Polled {} repositories: {} tasks, {} records skipped, {} repositories skipped",
                connector.repositories().len(),
                stats.tasks,
                stats.skipped_records,
                stats.skipped_repositories
            );
            for error in &stats.errors {
                eprintln!("  ! {}", error);
            }
            eprintln!("Next cursor: {}", next_cursor);
        }

        // Handled in run() before a connector exists
        Commands::Validate => {}
    }

    Ok(())
}
