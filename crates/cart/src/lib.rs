//! Cafe Erised Cart - the session cart and its checkout hand-off.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the cart for one session. It is created explicitly
//!   and passed to whatever reads or mutates it; there is no global cart.
//! - [`CartStorage`] is the persistence port. The store hydrates from it once
//!   and writes the whole cart back after every mutation.
//! - [`Checkout`] formats the order message and the messaging deep link. It
//!   is a pure function of a cart snapshot and [`CheckoutConfig`].
//!
//! # Example
//!
//! ```
//! use cafe_erised_cart::{CartStore, Checkout, CheckoutConfig, MemoryStorage, DEFAULT_CART_KEY};
//! use cafe_erised_core::{Price, ProductId};
//!
//! let mut store = CartStore::open(MemoryStorage::new(), DEFAULT_CART_KEY);
//! let coffee = ProductId::parse("c1").unwrap();
//! store.add_line(coffee.clone(), "Cold Coffee", Price::new(3000));
//! store.add_line(coffee, "Cold Coffee", Price::new(3000));
//! assert_eq!(store.total(), Price::new(6000));
//!
//! let link = Checkout::new(CheckoutConfig::default()).link(store.cart());
//! assert!(link.summary.contains("2x Cold Coffee (Rs 6000)"));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod storage;
pub mod store;

pub use checkout::{Checkout, CheckoutLink};
pub use config::{CartConfig, CheckoutConfig, ConfigError, ErisedConfig};
pub use storage::{CartStorage, DEFAULT_CART_KEY, FileStorage, MemoryStorage, StorageError};
pub use store::{CartStore, Hydration, Listener, SharedCart, SubscriptionId};
