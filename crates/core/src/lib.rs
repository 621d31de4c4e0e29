//! Cafe Erised Core - Shared types library.
//!
//! This crate provides the ordering domain used by the other Cafe Erised
//! components:
//! - `cart` - Cart store, persistence and checkout hand-off
//! - `cli` - Terminal front-end for browsing the menu and placing orders
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! logging. A [`Cart`] is a plain value that applies mutations and reports
//! what changed; owning, persisting and observing it is the cart crate's job.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, cart lines, carts, and the menu

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
