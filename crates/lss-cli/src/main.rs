//! lss - Command-line interface for LiveSplit splits files
//!
//! Inspect runs, export their history as tables, summarize them and check
//! that files survive a read/write round trip.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod error;

use cli::{time_kind_switch, Cli, Commands};
use commands::check::run_check;
use commands::compare::run_compare;
use commands::completions::run_completions;
use commands::inspect::run_inspect;
use commands::rewrite::run_rewrite;
use commands::stats::run_stats;
use commands::table::run_table;
use config::CliConfig;
use error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lss=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref()).map_err(CliError::Config)?;

    match cli.command {
        Commands::Inspect { file, json } => run_inspect(&file, json),
        Commands::Table {
            file,
            switches,
            format,
            output,
        } => {
            let settings = config.table.resolve(switches.flags(format.map(Into::into)));
            run_table(&file, &settings, output.as_deref())
        }
        Commands::Stats {
            file,
            game_time,
            real_time,
            json,
        } => {
            let time_kind =
                time_kind_switch(game_time, real_time).unwrap_or(config.table.time_kind);
            run_stats(&file, time_kind, json)
        }
        Commands::Check { files } => run_check(&files),
        Commands::Rewrite { file, output, emit } => {
            run_rewrite(&file, output.as_deref(), emit.into())
        }
        Commands::Compare {
            first,
            second,
            loose,
        } => run_compare(&first, &second, loose),
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
    }
}
