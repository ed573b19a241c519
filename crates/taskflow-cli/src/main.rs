//! taskflow CLI - Command-line interface for tracking tasks
//!
//! Every command goes through the same optimistic task list the apps use,
//! backed by a local libSQL database or a Turso embedded replica.

mod cli;
mod commands;
mod error;


use clap::{CommandFactory, Parser};
use taskflow_core::ClientConfig;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::resolve_config;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::list::{run_list, StatusFilter};
use crate::commands::show::run_show;
use crate::commands::sync::run_sync;
use crate::commands::toggle::run_toggle;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    let config_path = cli.config.clone().or_else(ClientConfig::default_path);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Config { command } => {
            return run_config(command, config_path.as_deref(), cli.db_path, cli.user);
        }
        Commands::Completions { shell, output } => {
            return run_completions(shell, output.as_deref());
        }
        _ => {}
    }

    let config = resolve_config(config_path.as_deref(), cli.db_path, cli.user)?;
    match command {
        Commands::Add { title, fields } => {
            run_add(&title, fields, &config).await?;
        }
        Commands::List {
            pending,
            done,
            json,
        } => {
            run_list(StatusFilter::from_flags(pending, done), json, &config).await?;
        }
        Commands::Show { id, json } => run_show(&id, json, &config).await?,
        Commands::Edit { id, title, fields } => run_edit(&id, title, fields, &config).await?,
        Commands::Toggle { id } => {
            run_toggle(&id, &config).await?;
        }
        Commands::Delete { id, yes } => {
            run_delete(&id, yes, &config).await?;
        }
        Commands::Sync => run_sync(&config).await?,
        Commands::Config { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}

fn init_tracing() -> Result<(), CliError> {
    let directive: Directive = "taskflow=info"
        .parse()
        .map_err(|error| CliError::Config(format!("invalid log directive: {error}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
