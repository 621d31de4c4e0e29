//! The cart store.
//!
//! [`CartStore`] owns the session's [`Cart`], hydrates it from a
//! [`CartStorage`] once, and rewrites the whole cart to storage after every
//! mutation. Presentation code registers listeners with
//! [`CartStore::subscribe`] and redraws when they fire.
//!
//! # Failure handling
//!
//! Nothing here returns an error to the caller:
//! - unreadable or invalid stored data hydrates as an empty cart
//! - a failed write keeps the in-memory change and is reported through
//!   [`CartStore::last_persist_error`]

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cafe_erised_core::{Cart, CartEvent, CartLine, MenuItem, Price, ProductId};
use tracing::instrument;

use crate::storage::{CartStorage, StorageError};

/// Callback invoked after a mutation changed the cart.
pub type Listener = Box<dyn FnMut(&CartEvent, &Cart) + Send>;

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// How the cart was obtained at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    /// Nothing was stored under the key.
    Missing,
    /// The stored cart was restored.
    Restored,
    /// Stored data was unreadable or invalid and was ignored.
    Discarded(String),
}

/// Owner of the session cart.
pub struct CartStore<S> {
    storage: S,
    key: String,
    cart: Cart,
    hydration: Hydration,
    last_persist_error: Option<StorageError>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the cart stored under `key`, falling back to an empty cart.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let (cart, hydration) = hydrate(&storage, &key);

        tracing::debug!(
            key = %key,
            lines = cart.len(),
            hydration = ?hydration,
            "Cart opened"
        );

        Self {
            storage,
            key,
            cart,
            hydration,
            last_persist_error: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// An existing line is incremented by exactly 1; otherwise a new line
    /// with quantity 1 is appended.
    #[instrument(skip(self, name), fields(key = %self.key))]
    pub fn add_line(&mut self, id: ProductId, name: impl Into<String>, unit_price: Price) {
        let event = self.cart.add_line(id, name, unit_price);
        self.commit(event);
    }

    /// Add one unit of a menu item.
    pub fn add_item(&mut self, item: &MenuItem) {
        self.add_line(item.id.clone(), item.name.clone(), item.price);
    }

    /// Remove a line. Absent ids leave the cart unchanged.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn remove_line(&mut self, id: &ProductId) {
        let event = self.cart.remove_line(id);
        self.commit(event);
    }

    /// Set a line's quantity exactly. Values below 1 remove the line.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        let event = self.cart.set_quantity(id, quantity);
        self.commit(event);
    }

    /// Remove every line.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn clear(&mut self) {
        let event = self.cart.clear();
        self.commit(event);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current cart snapshot.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Sum of `unit_price * quantity`.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Outcome of start-up hydration.
    #[must_use]
    pub const fn hydration(&self) -> &Hydration {
        &self.hydration
    }

    /// Error from the most recent write, cleared by the next successful one.
    #[must_use]
    pub const fn last_persist_error(&self) -> Option<&StorageError> {
        self.last_persist_error.as_ref()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a listener called after every mutation that changed the cart.
    ///
    /// Listeners run after the cart has been persisted, in registration order.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CartEvent, &Cart) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Persist unconditionally, then notify if something changed.
    fn commit(&mut self, event: Option<CartEvent>) {
        self.persist();

        let Some(event) = event else {
            return;
        };
        tracing::debug!(
            event = ?event,
            lines = self.cart.len(),
            total = %self.cart.total(),
            "Cart updated"
        );
        for (_, listener) in &mut self.listeners {
            listener(&event, &self.cart);
        }
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.cart)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.store(&self.key, &json));

        match result {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to persist cart");
                self.last_persist_error = Some(e);
            }
        }
    }
}

fn hydrate<S: CartStorage>(storage: &S, key: &str) -> (Cart, Hydration) {
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (Cart::new(), Hydration::Missing),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to read stored cart, starting empty");
            return (Cart::new(), Hydration::Discarded(e.to_string()));
        }
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => (cart, Hydration::Restored),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Stored cart is invalid, starting empty");
            (Cart::new(), Hydration::Discarded(e.to_string()))
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.storage)
            .field("key", &self.key)
            .field("cart", &self.cart)
            .field("hydration", &self.hydration)
            .field("last_persist_error", &self.last_persist_error)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// =============================================================================
// Shared handle
// =============================================================================

/// Cloneable handle that serializes access to one [`CartStore`].
///
/// Use this when more than one event source mutates the same cart. Listeners
/// run while the lock is held and must not call back into the handle.
pub struct SharedCart<S> {
    inner: Arc<Mutex<CartStore<S>>>,
}

impl<S: CartStorage> SharedCart<S> {
    #[must_use]
    pub fn new(store: CartStore<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn add_line(&self, id: ProductId, name: impl Into<String>, unit_price: Price) {
        self.lock().add_line(id, name, unit_price);
    }

    pub fn remove_line(&self, id: &ProductId) {
        self.lock().remove_line(id);
    }

    pub fn set_quantity(&self, id: &ProductId, quantity: i64) {
        self.lock().set_quantity(id, quantity);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.lock().cart().clone()
    }

    // A panicking listener poisons the lock; the cart itself is still
    // consistent because every mutation completes before listeners run.
    fn lock(&self) -> MutexGuard<'_, CartStore<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> Clone for SharedCart<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
