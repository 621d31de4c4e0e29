//! Cart value types.
//!
//! [`Cart`] is a plain value: an insertion-ordered list of [`CartLine`]s with
//! at most one line per [`ProductId`]. It knows how to apply the four cart
//! mutations and reports what changed as a [`CartEvent`]. Persistence and
//! change notification live in the `cafe-erised-cart` crate.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Errors raised when building a [`Cart`] from raw lines.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Two lines share the same product id.
    #[error("duplicate cart line for product {0}")]
    DuplicateLine(ProductId),
    /// A line has a quantity of zero.
    #[error("cart line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),
}

/// One row of the cart.
///
/// Serialized as `{ "id", "name", "unitPrice", "quantity" }`. Older carts
/// stored the unit price under `price`, which is still accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CartLine {
    /// Product identifier, unique within the cart.
    pub id: ProductId,
    /// Display label.
    pub name: String,
    /// Price of a single unit.
    #[serde(alias = "price")]
    pub unit_price: Price,
    /// Number of units, always at least 1 inside a [`Cart`].
    pub quantity: u32,
}

impl CartLine {
    /// Create a line with quantity 1.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A change applied to a [`Cart`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A new line was appended with quantity 1.
    LineAdded {
        /// Product id of the new line.
        id: ProductId,
    },
    /// An existing line's quantity changed.
    QuantityChanged {
        /// Product id of the line.
        id: ProductId,
        /// Quantity before the change.
        from: u32,
        /// Quantity after the change.
        to: u32,
    },
    /// A line was removed.
    LineRemoved {
        /// Product id of the removed line.
        id: ProductId,
    },
    /// Every line was removed.
    Cleared,
}

/// The user's in-progress order.
///
/// Invariants:
/// - at most one line per product id
/// - every line has a quantity of at least 1
///
/// `total()` and `item_count()` are recomputed from the lines on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from existing lines, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns an error if two lines share an id or a line has zero quantity.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, CartError> {
        for (index, line) in lines.iter().enumerate() {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(line.id.clone()));
            }
            if lines.iter().take(index).any(|prev| prev.id == line.id) {
                return Err(CartError::DuplicateLine(line.id.clone()));
            }
        }
        Ok(Self { lines })
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line's quantity by exactly 1, or appends a new
    /// line with quantity 1. The stored name and price of an existing line are
    /// left as they are. Returns `None` only if the quantity is already at
    /// `u32::MAX`.
    pub fn add_line(
        &mut self,
        id: ProductId,
        name: impl Into<String>,
        unit_price: Price,
    ) -> Option<CartEvent> {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            let from = line.quantity;
            let to = from.checked_add(1)?;
            line.quantity = to;
            return Some(CartEvent::QuantityChanged { id, from, to });
        }

        self.lines.push(CartLine::new(id.clone(), name, unit_price));
        Some(CartEvent::LineAdded { id })
    }

    /// Remove a line. Absent ids are a no-op and return `None`.
    pub fn remove_line(&mut self, id: &ProductId) -> Option<CartEvent> {
        let index = self.lines.iter().position(|line| &line.id == id)?;
        let removed = self.lines.remove(index);
        Some(CartEvent::LineRemoved { id: removed.id })
    }

    /// Set a line's quantity exactly.
    ///
    /// A quantity below 1 removes the line. Quantities above `u32::MAX` are
    /// clamped. Absent ids and unchanged quantities return `None`.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> Option<CartEvent> {
        if quantity < 1 {
            return self.remove_line(id);
        }

        let to = u32::try_from(quantity).unwrap_or(u32::MAX);
        let line = self.lines.iter_mut().find(|line| &line.id == id)?;
        let from = line.quantity;
        if from == to {
            return None;
        }
        line.quantity = to;
        Some(CartEvent::QuantityChanged {
            id: id.clone(),
            from,
            to,
        })
    }

    /// Remove every line. Returns `None` if the cart was already empty.
    pub fn clear(&mut self) -> Option<CartEvent> {
        if self.lines.is_empty() {
            return None;
        }
        self.lines.clear();
        Some(CartEvent::Cleared)
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CartError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = core::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    fn assert_sums(cart: &Cart) {
        let total: u64 = cart
            .lines()
            .iter()
            .map(|l| l.unit_price.minor_units() * u64::from(l.quantity))
            .sum();
        let count: u64 = cart.lines().iter().map(|l| u64::from(l.quantity)).sum();
        assert_eq!(cart.total().minor_units(), total);
        assert_eq!(cart.item_count(), count);
    }

    #[test]
    fn test_add_same_id_increments() {
        let mut cart = Cart::new();
        for expected in 1..=5 {
            cart.add_line(id("c1"), "Cold Coffee", Price::new(3000));
            assert_eq!(cart.len(), 1);
            assert_eq!(cart.find(&id("c1")).unwrap().quantity, expected);
            assert_sums(&cart);
        }
    }

    #[test]
    fn test_add_twice_scenario() {
        let mut cart = Cart::new();
        let first = cart.add_line(id("c1"), "Cold Coffee", Price::new(3000));
        let second = cart.add_line(id("c1"), "Cold Coffee", Price::new(3000));

        assert_eq!(first, Some(CartEvent::LineAdded { id: id("c1") }));
        assert_eq!(
            second,
            Some(CartEvent::QuantityChanged {
                id: id("c1"),
                from: 1,
                to: 2
            })
        );
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), Price::new(6000));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add_line(id("m2"), "Chocolate Wands", Price::new(250));
        cart.add_line(id("c1"), "Cold Coffee", Price::new(3000));
        cart.add_line(id("m2"), "Chocolate Wands", Price::new(250));

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["m2", "c1"]);
    }

    #[test]
    fn test_add_keeps_existing_name_and_price() {
        let mut cart = Cart::new();
        cart.add_line(id("c1"), "Cold Coffee", Price::new(3000));
        cart.add_line(id("c1"), "Renamed", Price::new(1));

        let line = cart.find(&id("c1")).unwrap();
        assert_eq!(line.name, "Cold Coffee");
        assert_eq!(line.unit_price, Price::new(3000));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_line(id("c1"), "Cold Coffee", Price::new(3000));
        let before = cart.clone();

        assert_eq!(cart.remove_line(&id("zz")), None);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_present() {
        let mut cart = Cart::new();
        cart.add_line(id("c1"), "Cold Coffee", Price::new(3000));
        cart.add_line(id("m2"), "Chocolate Wands", Price::new(250));

        assert_eq!(
            cart.remove_line(&id("c1")),
            Some(CartEvent::LineRemoved { id: id("c1") })
        );
        assert_eq!(cart.len(), 1);
        assert_sums(&cart);
    }

    #[test]
    fn test_set_quantity_zero_and_negative_remove() {
        for quantity in [0, -5] {
            let mut cart = Cart::new();
            cart.add_line(id("c1"), "Cold Coffee", Price::new(3000));
            cart.set_quantity(&id("c1"), quantity);
            assert!(cart.is_empty());

            let mut removed = Cart::new();
            removed.add_line(id("c1"), "Cold Coffee", Price::new(3000));
            removed.remove_line(&id("c1"));
            assert_eq!(cart, removed);
        }
    }

    #[test]
    fn test_set_quantity_is_exact() {
        let mut cart = Cart::new();
        cart.add_line(id("c1"), "Cold Coffee", Price::new(3000));
        cart.set_quantity(&id("c1"), 4);
        cart.set_quantity(&id("c1"), 3);

        assert_eq!(cart.find(&id("c1")).unwrap().quantity, 3);
        assert_eq!(cart.total(), Price::new(9000));
        assert_sums(&cart);
    }

    #[test]
    fn test_set_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        assert_eq!(cart.set_quantity(&id("c1"), 3), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_same_value_reports_nothing() {
        let mut cart = Cart::new();
        cart.add_line(id("c1"), "Cold Coffee", Price::new(3000));
        assert_eq!(cart.set_quantity(&id("c1"), 1), None);
    }

    #[test]
    fn test_set_quantity_clamps_large_values() {
        let mut cart = Cart::new();
        cart.add_line(id("c1"), "Cold Coffee", Price::new(1));
        cart.set_quantity(&id("c1"), i64::MAX);
        assert_eq!(cart.find(&id("c1")).unwrap().quantity, u32::MAX);
        assert_eq!(cart.add_line(id("c1"), "Cold Coffee", Price::new(1)), None);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        assert_eq!(cart.clear(), None);
        cart.add_line(id("c1"), "Cold Coffee", Price::new(3000));
        assert_eq!(cart.clear(), Some(CartEvent::Cleared));
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_from_lines_rejects_duplicates() {
        let lines = vec![
            CartLine::new(id("c1"), "Cold Coffee", Price::new(3000)),
            CartLine::new(id("c1"), "Cold Coffee", Price::new(3000)),
        ];
        assert_eq!(
            Cart::from_lines(lines),
            Err(CartError::DuplicateLine(id("c1")))
        );
    }

    #[test]
    fn test_from_lines_rejects_zero_quantity() {
        let mut line = CartLine::new(id("c1"), "Cold Coffee", Price::new(3000));
        line.quantity = 0;
        assert_eq!(
            Cart::from_lines(vec![line]),
            Err(CartError::ZeroQuantity(id("c1")))
        );
    }

    #[test]
    fn test_serialized_layout() {
        let mut cart = Cart::new();
        cart.add_line(id("c1"), "Cold Coffee", Price::new(3000));
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(
            json,
            r#"[{"id":"c1","name":"Cold Coffee","unitPrice":3000,"quantity":1}]"#
        );
    }

    #[test]
    fn test_deserialize_accepts_legacy_price_field() {
        let cart: Cart =
            serde_json::from_str(r#"[{"id":"c1","name":"Butterbeer","price":710,"quantity":2}]"#)
                .unwrap();
        assert_eq!(cart.total(), Price::new(1420));
    }

    #[test]
    fn test_deserialize_rejects_schema_violations() {
        let cases = [
            r#"{"id":"c1"}"#,
            r#"[{"id":"c1","name":"A","unitPrice":-1,"quantity":1}]"#,
            r#"[{"id":"c1","name":"A","unitPrice":1.5,"quantity":1}]"#,
            r#"[{"id":"","name":"A","unitPrice":1,"quantity":1}]"#,
            r#"[{"id":"c1","name":"A","unitPrice":1,"quantity":0}]"#,
            r#"[{"id":"c1","name":"A","unitPrice":1}]"#,
            r#"[{"id":"c1","name":"A","unitPrice":1,"quantity":2,"bogus":true}]"#,
            r#"[{"id":"c1","name":"A","unitPrice":1,"quantity":1},{"id":"c1","name":"A","unitPrice":1,"quantity":1}]"#,
        ];
        for case in cases {
            assert!(serde_json::from_str::<Cart>(case).is_err(), "{case}");
        }
    }
}
