use anyhow::Context;
use clap::Parser;
use eventizer_survey::EngineConfig;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;
mod commands;

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eventizer=info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let mut store = eventizer_sqlite_store::SqliteStore::open(&cli.database)
        .with_context(|| format!("opening {}", cli.database.display()))?;

    match cli.command {
        Command::Seed => commands::seed(&mut store),
        Command::Fill {
            target,
            email,
            plain,
        } => commands::fill(&mut store, &target, email, plain, &config),
        Command::Summary { target, json } => commands::summary(&store, &target, json, &config),
        Command::Export {
            target,
            format,
            output,
            search,
            filter,
            order,
            rtl,
            bom,
        } => {
            let export = commands::ExportRequest {
                format,
                output,
                search,
                filter,
                order: order.into(),
                rtl,
                bom,
            };
            commands::export(&store, &target, &export, &config)
        }
    }
}
