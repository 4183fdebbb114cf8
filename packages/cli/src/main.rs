mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, new_block, replay, CheckArgs, NewArgs, ReplayArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Blockforge CLI - inspect and replay block editor documents
#[derive(Parser, Debug)]
#[command(name = "blockforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Editor config (defaults to ./blockforge.config.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log editor operations
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a block document's structure
    Check(CheckArgs),

    /// Apply a script of surface messages to a document
    Replay(ReplayArgs),

    /// Print a new block with catalog defaults
    New(NewArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = config::load(&cwd, cli.config.as_deref())?;

    match cli.command {
        Command::Check(args) => check(args),
        Command::Replay(args) => replay(args, &config),
        Command::New(args) => new_block(args),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
