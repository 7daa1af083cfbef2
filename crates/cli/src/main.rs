//! Bistro CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (schema + session table)
//! bistro-cli migrate
//!
//! # Load the menu from a YAML file
//! bistro-cli seed crates/cli/seed/menu.yaml
//!
//! # Grant or revoke admin access
//! bistro-cli user promote --email owner@example.com
//! bistro-cli user demote --email owner@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `BISTRO_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bistro-cli")]
#[command(author, version, about = "Bistro CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert or update categories, products and their options
    Seed {
        /// Path to the menu YAML file
        file: PathBuf,
    },
    /// Manage user roles
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Give a user the ADMIN role
    Promote {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Return a user to the USER role
    Demote {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::run(&file).await?,
        Commands::User { action } => match action {
            UserAction::Promote { email } => {
                commands::user::set_role(&email, bistro_core::UserRole::Admin).await?;
            }
            UserAction::Demote { email } => {
                commands::user::set_role(&email, bistro_core::UserRole::User).await?;
            }
        },
    }
    Ok(())
}
