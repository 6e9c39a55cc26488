//! Savory CLI - Database migrations and menu management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! savory migrate
//!
//! # Seed the menu from the default YAML file
//! savory seed menu
//!
//! # Replace the whole menu with the contents of another file
//! savory seed menu --file custom-menu.yaml --replace
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed menu` - Load meals into the menu from a YAML file

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "savory")]
#[command(author, version, about = "Savory CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed database tables
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Load meals into the menu from a YAML file
    Menu {
        /// Path to the menu YAML file
        #[arg(short, long, default_value = "crates/cli/data/menu.yaml")]
        file: String,

        /// Delete the existing menu before inserting
        #[arg(long)]
        replace: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Menu { file, replace } => {
                commands::seed::menu(&file, replace).await?;
            }
        },
    }
    Ok(())
}
