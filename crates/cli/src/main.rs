//! Acumen CLI - catalog inspection and cart management.
//!
//! # Usage
//!
//! ```bash
//! # List featured watches
//! acumen catalog list --featured
//!
//! # Check an alternate catalog file before deploying it
//! acumen catalog validate --path catalog.json
//!
//! # Inspect and edit the persisted cart
//! acumen cart show
//! acumen cart add axion01 -q 2
//! acumen cart remove axion01
//! acumen cart clear
//! ```
//!
//! Reads the same `STOREFRONT_*` variables as the storefront server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "acumen")]
#[command(author, version, about = "Acumen Watches CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Only products in this collection
        #[arg(short, long)]
        collection: Option<String>,

        /// Only featured products
        #[arg(short, long)]
        featured: bool,

        /// At most this many products
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Load and validate a catalog file (default: configured catalog)
    Validate {
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print cart lines, item count and subtotal
    Show,
    /// Add a product
    Add {
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Remove a product's line
    Remove { product_id: String },
    /// Empty the cart
    Clear,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => print(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

#[allow(clippy::print_stdout)]
fn print(output: &str) {
    if !output.is_empty() {
        println!("{output}");
    }
}

fn run(cli: Cli) -> Result<String, commands::CliError> {
    let config = commands::load_config()?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                collection,
                featured,
                limit,
            } => {
                let catalog = config.load_catalog()?;
                let filter = commands::catalog::filter(collection, featured, limit);
                Ok(commands::catalog::list(&catalog, &filter))
            }
            CatalogAction::Validate { path } => {
                let report = match path {
                    Some(path) => commands::catalog::validate_file(&path)?,
                    None => commands::catalog::summary(&config.load_catalog()?),
                };
                Ok(report)
            }
        },
        Commands::Cart { action } => {
            let mut engine = commands::cart::open(&config)?;
            match action {
                CartAction::Show => Ok(commands::cart::show(&engine)),
                CartAction::Add {
                    product_id,
                    quantity,
                } => commands::cart::add(&mut engine, &product_id, quantity),
                CartAction::Remove { product_id } => {
                    commands::cart::remove(&mut engine, &product_id)
                }
                CartAction::Clear => commands::cart::clear(&mut engine),
            }
        }
    }
}
