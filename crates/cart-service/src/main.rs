//! # `cart`
//!
//! Command-line front end for a persisted shopping cart.
//!
//! ```bash
//! cart add 1           # one more unit of product 1
//! cart set 1 3         # exactly three units
//! cart remove 1
//! cart show
//! ```
//!
//! Every command prints the resulting cart as JSON. The configuration file is
//! taken from `--config`, then `$CART_CONFIG`; without either the defaults are
//! used.

use cart_core::{NotificationSink, ProductId, UpdateProductAmount};
use cart_service::client::ClientError;
use cart_service::config::{ServiceConfig, CONFIG_ENV};
use cart_service::lifecycle::{setup_tracing, CartSystem};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "cart")]
#[command(version)]
#[command(about = "Manage a shopping cart backed by a remote inventory", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current cart
    Show,
    /// Add one unit of a product
    Add { product_id: u32 },
    /// Remove a product entirely
    #[clap(visible_alias = "rm")]
    Remove { product_id: u32 },
    /// Set the quantity of a product already in the cart
    Set {
        product_id: u32,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// Prints user notices on stderr.
struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn report_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

fn load_config(cli_path: Option<PathBuf>) -> Result<ServiceConfig, String> {
    let path = cli_path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading config");
            ServiceConfig::load(&path).map_err(|e| e.to_string())
        }
        None => Ok(ServiceConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    let system = CartSystem::start(&config, ConsoleNotifier)
        .await
        .map_err(|e| e.to_string())?;
    let client = system.cart_client.clone();

    let outcome = match cli.command {
        Commands::Show => Ok(()),
        Commands::Add { product_id } => client.add_product(ProductId(product_id)).await.map(drop),
        Commands::Remove { product_id } => {
            client.remove_product(ProductId(product_id)).await.map(drop)
        }
        Commands::Set { product_id, amount } => client
            .update_product_amount(UpdateProductAmount::new(ProductId(product_id), amount))
            .await
            .map(drop),
    };

    let cart = client.snapshot().await.map_err(|e| e.to_string())?;
    let rendered = serde_json::to_string_pretty(&cart).map_err(|e| e.to_string())?;
    println!("{rendered}");

    drop(client);
    system.shutdown().await.map_err(|e| e.to_string())?;

    match outcome {
        Ok(()) => Ok(()),
        // Already shown to the user by the notifier.
        Err(ClientError::Cart(e)) => {
            info!(error = %e, "Command rejected");
            std::process::exit(1);
        }
        Err(e) => Err(e.to_string()),
    }
}
