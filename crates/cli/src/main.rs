//! Grocer CLI - Database migrations, catalog seeding and user management.
//!
//! # Usage
//!
//! ```bash
//! # Apply the storefront schema and the session table
//! grocer-cli migrate
//!
//! # Insert the default catalog if the product table is empty
//! grocer-cli seed
//!
//! # Wipe products and orders, reseed, and create the demo account
//! grocer-cli seed --reset --demo-user
//!
//! # Create a shopper account
//! grocer-cli user create -n "Jane Doe" -e jane@example.com -p secret
//! ```
//!
//! All commands read `GROCER_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "grocer-cli")]
#[command(author, version, about = "Grocer CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the product catalog
    Seed {
        /// Delete all products, carts and orders before seeding
        #[arg(long)]
        reset: bool,

        /// Also create the demo shopper account
        #[arg(long)]
        demo_user: bool,
    },
    /// Manage shopper accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new shopper account
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address (login)
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { reset, demo_user } => commands::seed::run(reset, demo_user).await?,
        Commands::User { action } => match action {
            UserAction::Create {
                name,
                email,
                password,
            } => {
                commands::user::create(&name, &email, &password).await?;
            }
        },
    }
    Ok(())
}
