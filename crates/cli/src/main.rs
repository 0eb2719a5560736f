//! Heritage Mall CLI - drive the client state container by hand.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the cart twice, then inspect the totals
//! mall-cli cart add --id 7 --name "Silk fan" --price 59.90
//! mall-cli cart add --id 7 --name "Silk fan" --price 59.90
//! mall-cli cart show
//!
//! # Save an address and make it the default
//! mall-cli address add --name "Li Wei" --phone 13800000000 \
//!     --region "Zhejiang Hangzhou" --detail "1 West Lake Rd" --default
//!
//! # Turn the selected cart rows into an order
//! mall-cli order place
//!
//! # Print the persisted snapshot
//! mall-cli snapshot
//! ```
//!
//! # Commands
//!
//! - `favorite` - Favorites
//! - `cart` - Shopping cart
//! - `address` - Shipping addresses
//! - `history` - Browse history
//! - `order` - Orders
//! - `snapshot` - Print the persisted blob
//! - `reset` - Remove the persisted blob
//!
//! Configuration is read from the environment (see `StoreConfig::from_env`).
//! Logs go to stderr; command output is pretty JSON on stdout.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heritage_mall_store::{FileStore, LogFormat, Store, StoreConfig};

mod commands;

use commands::{AddressAction, CartAction, CliError, FavoriteAction, HistoryAction, OrderAction};

#[derive(Parser)]
#[command(name = "mall-cli")]
#[command(author, version, about = "Heritage Mall state container CLI")]
struct Cli {
    /// Snapshot directory (overrides `MALL_STATE_DIR`)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage favorites
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage shipping addresses
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// Manage browse history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Manage orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Print the persisted snapshot
    Snapshot,
    /// Remove the persisted snapshot
    Reset,
}

#[allow(clippy::print_stderr)]
fn main() {
    let cli = Cli::parse();

    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };
    let config = match cli.state_dir.clone() {
        Some(dir) => config.with_state_dir(dir),
        None => config,
    };

    init_tracing(config.log_format);

    if let Err(e) = run(cli.command, &config) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    // Defaults to warnings only so command output stays readable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "heritage_mall_store=warn,mall_cli=info".into());

    let is_json = format == LogFormat::Json;
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn run(command: Commands, config: &StoreConfig) -> Result<(), CliError> {
    let storage = FileStore::new(&config.state_dir);
    let mut store = Store::open(storage, config);

    let output = match command {
        Commands::Favorite { action } => commands::favorite::run(&mut store, action)?,
        Commands::Cart { action } => commands::cart::run(&mut store, action)?,
        Commands::Address { action } => commands::address::run(&mut store, action)?,
        Commands::History { action } => commands::history::run(&mut store, action)?,
        Commands::Order { action } => commands::order::run(&mut store, action)?,
        Commands::Snapshot => serde_json::to_value(store.snapshot())?,
        Commands::Reset => {
            store.slot().clear()?;
            tracing::info!(dir = %config.state_dir.display(), "snapshot removed");
            return Ok(());
        }
    };

    if store.persist_failures() > 0 {
        return Err(CliError::NotSaved(store.persist_failures()));
    }

    print_json(&output)
}

#[allow(clippy::print_stdout)]
fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
