//! Integration tests for Cafe Erised.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cafe-erised-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - File-backed store, hydration and recovery
//! - `checkout_handoff` - Order message and deep link from a hydrated cart

use std::path::{Path, PathBuf};

/// A unique scratch directory, removed when dropped.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Reserve a fresh directory path under the system temp dir.
    ///
    /// The directory itself is created lazily by whoever writes into it.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let path = std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::new_v4()));
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
