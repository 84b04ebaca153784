//! Partner shop directory CLI.
//!
//! # Usage
//!
//! ```bash
//! # List shops (served from the client cache unless --refresh)
//! ps-cli shops list --refresh
//!
//! # Delete a shop, asking for confirmation
//! ps-cli shops delete 7
//!
//! # Delete without the prompt
//! ps-cli shops delete 7 --yes
//! ```
//!
//! Both commands read `DATA_SERVICE_URL` and `API_KEY` from the environment
//! (or `.env`). Deletion always runs in admin mode.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use partner_shops_core::ShopId;

mod commands;

#[derive(Parser)]
#[command(name = "ps-cli")]
#[command(author, version, about = "Partner shop directory tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and manage partner shops
    Shops {
        #[command(subcommand)]
        action: ShopsAction,
    },
}

#[derive(Subcommand)]
enum ShopsAction {
    /// List shops from the data service
    List {
        /// Bypass the client cache
        #[arg(short, long)]
        refresh: bool,
    },
    /// Delete a shop
    Delete {
        /// Shop identifier
        id: ShopId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ps_cli=info,partner_shops_web=warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::shops::ShopsCommandError> {
    match cli.command {
        Commands::Shops { action } => match action {
            ShopsAction::List { refresh } => commands::shops::list(refresh).await,
            ShopsAction::Delete { id, yes } => commands::shops::delete(id, yes).await,
        },
    }
}
