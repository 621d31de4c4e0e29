//! Cafe Erised CLI - browse the menu, build an order, and hand it off.
//!
//! # Usage
//!
//! ```bash
//! # Show the menu
//! erised menu
//!
//! # Add one Butterbeer and two Chocolate Wands
//! erised add c1
//! erised add m2
//! erised add m2
//!
//! # Review and send
//! erised show
//! erised checkout
//! ```
//!
//! # Commands
//!
//! - `menu` - List menu items by category
//! - `show` - Show the cart and subtotal
//! - `add`, `remove`, `set`, `clear` - Change the cart
//! - `checkout` - Print the order message and the messaging link
//!
//! The cart is kept in `<storage dir>/<cart key>.json` between runs. See
//! `cafe_erised_cart::config` for the environment variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use cafe_erised_cart::{CartStore, Checkout, ErisedConfig, FileStorage};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "erised")]
#[command(author, version, about = "Cafe Erised ordering CLI")]
struct Cli {
    /// Directory the cart is stored in (overrides `ERISED_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// YAML menu to use instead of the house menu
    #[arg(long, global = true)]
    menu: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List menu items by category
    Menu,
    /// Show the cart
    Show,
    /// Add one unit of a menu item
    Add {
        /// Menu item id (e.g., c1)
        id: String,
    },
    /// Remove an item from the cart
    Remove {
        /// Menu item id
        id: String,
    },
    /// Set the quantity of an item already in the cart (0 or less removes it)
    Set {
        /// Menu item id
        id: String,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Print the order message and the link that sends it
    Checkout,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = ErisedConfig::from_env()?;
    let currency = config.checkout.currency_label.clone();
    let menu = commands::menu::load(cli.menu.as_deref())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if matches!(cli.command, Commands::Menu) {
        commands::menu::show(&menu, &currency, &mut out)?;
        return Ok(out.flush()?);
    }

    let storage_dir = cli.storage_dir.unwrap_or(config.cart.storage_dir);
    let mut store = CartStore::open(FileStorage::new(storage_dir), config.cart.key);

    match cli.command {
        Commands::Menu => {}
        Commands::Show => commands::cart::show(&store, &currency, &mut out)?,
        Commands::Add { id } => commands::cart::add(&mut store, &menu, &id, &mut out)?,
        Commands::Remove { id } => commands::cart::remove(&mut store, &id, &mut out)?,
        Commands::Set { id, quantity } => {
            commands::cart::set(&mut store, &id, quantity, &mut out)?;
        }
        Commands::Clear => commands::cart::clear(&mut store, &mut out)?,
        Commands::Checkout => {
            let checkout = Checkout::new(config.checkout);
            commands::cart::checkout(&store, &checkout, &mut out)?;
        }
    }

    Ok(out.flush()?)
}
