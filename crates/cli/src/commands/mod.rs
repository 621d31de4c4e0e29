//! Command implementations.
//!
//! Commands write their output to any `io::Write` so they can be exercised
//! against an in-memory buffer.

use cafe_erised_cart::ConfigError;
use cafe_erised_core::{MenuError, ProductId, ProductIdError};
use thiserror::Error;

pub mod cart;
pub mod menu;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The menu file could not be used.
    #[error("Menu error: {0}")]
    Menu(#[from] MenuError),

    /// Reading a file or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The product id argument is malformed.
    #[error("Invalid product id: {0}")]
    InvalidProductId(#[from] ProductIdError),

    /// The product id is not on the menu.
    #[error("No menu item with id {0}. Run `erised menu` to list items.")]
    UnknownItem(ProductId),

    /// Checkout was requested for an empty cart.
    #[error("Your cart is empty. Add something with `erised add <ID>` first.")]
    EmptyCart,
}
