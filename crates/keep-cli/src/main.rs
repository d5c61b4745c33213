//! Keep CLI - store individually encrypted items in a blob store.
//!
//! This is the command-line interface for Keep. It resolves configuration
//! from flags and environment variables, builds one vault per invocation,
//! and hands it to the command handlers.

mod cli;
mod commands;
mod config;
mod input;
mod store;

use clap::Parser;
use keep_core::VERSION;

use crate::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let Some(command) = &cli.command else {
        println!("Keep v{}", VERSION);
        println!("\nQuickstart:");
        println!("  echo secret | keep set some/key");
        println!("  keep get - some/key");
        println!("\nRun `keep --help` for full usage.");
        return Ok(());
    };

    let vault = config::build_vault(cli)?;
    let password = input::resolve_password(cli)?;

    match command {
        Commands::Set { key, file } => {
            commands::set::handle_set(&vault, &password, key, file.as_deref())
        }
        Commands::Get { target, key } => commands::get::handle_get(&vault, &password, target, key),
        Commands::Pass { key } => commands::pass::handle_pass(&vault, &password, key),
    }
}
