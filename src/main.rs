use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pinlex_rs::config::default_lex_path;
use pinlex_rs::handlers;
use pinlex_rs::util::cli::{Cli, Command};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::List { filter, json, lex } => {
            handlers::list(&lex_path(lex)?, filter.as_deref(), json)
        }
        Command::Export { output, lex } => handlers::export(&lex_path(lex)?, &output),
        Command::Import {
            input,
            lex,
            no_backup,
            dry_run,
            verbose,
        } => handlers::import(
            &lex_path(lex)?,
            &input,
            &handlers::ImportOptions {
                backup: !no_backup,
                dry_run,
                verbose,
            },
        ),
        Command::Inspect { lex, verbose } => handlers::inspect(&lex_path(lex)?, verbose),
    }
}

fn lex_path(arg: Option<PathBuf>) -> Result<PathBuf> {
    match arg {
        Some(path) => Ok(path),
        None => default_lex_path(),
    }
}
