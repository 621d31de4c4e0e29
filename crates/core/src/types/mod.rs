//! Core types for Cafe Erised.
//!
//! This module provides type-safe wrappers for the ordering domain.

pub mod cart;
pub mod id;
pub mod menu;
pub mod price;

pub use cart::{Cart, CartError, CartEvent, CartLine};
pub use id::{ProductId, ProductIdError};
pub use menu::{Menu, MenuCategory, MenuError, MenuItem};
pub use price::Price;
