//! Checkout hand-off.
//!
//! Orders are not submitted to a backend. Checkout turns the cart into a
//! plain-text order message and a messaging deep link that opens a chat with
//! the café with that message pre-filled:
//!
//! ```text
//! https://wa.me/923167059804?text=%2A%E2%9C%A8%20New%20Order...
//! ```
//!
//! Opening the link is the caller's job.

use cafe_erised_core::Cart;

use crate::config::CheckoutConfig;

/// Closing line of every order message.
const SIGN_OFF: &str = "I would like to place this order, please!";

/// Order message plus the link that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLink {
    /// Human-readable order summary.
    pub summary: String,
    /// Deep link with the summary percent-encoded in its `text` parameter.
    pub uri: String,
}

/// Builds order messages and deep links for a configured recipient.
#[derive(Debug, Clone)]
pub struct Checkout {
    config: CheckoutConfig,
}

impl Checkout {
    #[must_use]
    pub const fn new(config: CheckoutConfig) -> Self {
        Self { config }
    }

    /// Order summary for `cart`.
    ///
    /// One `▪️ {qty}x {name} ({currency} {subtotal})` row per line in cart
    /// order, followed by the grand total. An empty cart yields no rows and a
    /// zero total.
    #[must_use]
    pub fn summary(&self, cart: &Cart) -> String {
        let currency = &self.config.currency_label;

        let mut message = format!("*✨ New Order from {} ✨*\n\n", self.config.shop_name);
        message.push_str("*Order Details:*\n");
        for line in cart {
            message.push_str(&format!(
                "▪️ {}x {} ({currency} {})\n",
                line.quantity,
                line.name,
                line.subtotal()
            ));
        }
        message.push_str(&format!(
            "\n*Total Amount: {currency} {}*\n\n",
            cart.total()
        ));
        message.push_str(SIGN_OFF);
        message
    }

    /// Deep link carrying `summary` as its `text` query parameter.
    ///
    /// Everything except ASCII letters, digits and `-_.~` is percent-encoded,
    /// so newlines, emoji and arbitrary product names survive the round trip.
    #[must_use]
    pub fn uri_for(&self, summary: &str) -> String {
        format!(
            "https://{}/{}?text={}",
            self.config.messaging_host,
            self.config.recipient,
            urlencoding::encode(summary)
        )
    }

    /// Summary and deep link for `cart`.
    #[must_use]
    pub fn link(&self, cart: &Cart) -> CheckoutLink {
        let summary = self.summary(cart);
        let uri = self.uri_for(&summary);
        tracing::debug!(lines = cart.len(), total = %cart.total(), "Checkout link built");
        CheckoutLink { summary, uri }
    }
}
