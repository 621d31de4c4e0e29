//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! erised add c1          # one more Butterbeer
//! erised set c1 3        # exactly three
//! erised set c1 0        # remove it
//! erised remove m2
//! erised show
//! erised checkout        # print the order message and the WhatsApp link
//! erised clear
//! ```

use std::io::Write;

use cafe_erised_cart::{CartStorage, CartStore, Checkout};
use cafe_erised_core::{Menu, ProductId};

use super::CliError;

/// Print the cart with its subtotal.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn show<S: CartStorage>(
    store: &CartStore<S>,
    currency: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if store.is_empty() {
        writeln!(out, "Your cart is empty")?;
        return Ok(());
    }

    writeln!(out, "Your Order")?;
    for line in store.lines() {
        writeln!(
            out,
            "  {:>3}x {:<32} {currency} {:>6}  ({})",
            line.quantity,
            line.name,
            line.subtotal().to_string(),
            line.id.as_str()
        )?;
    }
    writeln!(
        out,
        "Subtotal: {currency} {} ({} items)",
        store.total(),
        store.item_count()
    )?;
    Ok(())
}

/// Add one unit of a menu item.
///
/// # Errors
///
/// Returns an error if the id is malformed or not on the menu.
pub fn add<S: CartStorage>(
    store: &mut CartStore<S>,
    menu: &Menu,
    id: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = ProductId::parse(id)?;
    let item = menu.find(&id).ok_or_else(|| CliError::UnknownItem(id.clone()))?;

    store.add_item(item);
    report_persist_failure(store);

    let quantity = store.cart().find(&id).map_or(0, |line| line.quantity);
    writeln!(out, "Added {} (now {quantity} in cart)", item.name)?;
    Ok(())
}

/// Remove a line from the cart.
///
/// # Errors
///
/// Returns an error if the id is malformed or writing fails.
pub fn remove<S: CartStorage>(
    store: &mut CartStore<S>,
    id: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = ProductId::parse(id)?;
    let Some(name) = store.cart().find(&id).map(|line| line.name.clone()) else {
        writeln!(out, "{id} is not in your cart")?;
        return Ok(());
    };

    store.remove_line(&id);
    report_persist_failure(store);

    writeln!(out, "Removed {name}")?;
    Ok(())
}

/// Set a line's quantity. Zero or less removes the line.
///
/// # Errors
///
/// Returns an error if the id is malformed or writing fails.
pub fn set<S: CartStorage>(
    store: &mut CartStore<S>,
    id: &str,
    quantity: i64,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = ProductId::parse(id)?;
    let Some(name) = store.cart().find(&id).map(|line| line.name.clone()) else {
        writeln!(out, "{id} is not in your cart")?;
        return Ok(());
    };

    store.set_quantity(&id, quantity);
    report_persist_failure(store);

    match store.cart().find(&id) {
        Some(line) => writeln!(out, "{name}: {} in cart", line.quantity)?,
        None => writeln!(out, "Removed {name}")?,
    }
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn clear<S: CartStorage>(
    store: &mut CartStore<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    store.clear();
    report_persist_failure(store);

    writeln!(out, "Cart cleared")?;
    Ok(())
}

/// Print the order message and the deep link that sends it.
///
/// # Errors
///
/// Returns [`CliError::EmptyCart`] if there is nothing to order.
pub fn checkout<S: CartStorage>(
    store: &CartStore<S>,
    checkout: &Checkout,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if store.is_empty() {
        return Err(CliError::EmptyCart);
    }

    let link = checkout.link(store.cart());
    writeln!(out, "{}", link.summary)?;
    writeln!(out)?;
    writeln!(out, "Open this link to send your order:")?;
    writeln!(out, "{}", link.uri)?;
    Ok(())
}

/// The change stands in memory even when it could not be saved.
fn report_persist_failure<S: CartStorage>(store: &CartStore<S>) {
    if let Some(e) = store.last_persist_error() {
        tracing::error!(error = %e, "Cart change was not saved and will be lost on exit");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cafe_erised_cart::{CheckoutConfig, DEFAULT_CART_KEY, MemoryStorage};
    use cafe_erised_core::Price;

    use super::*;

    fn store() -> CartStore<MemoryStorage> {
        CartStore::open(MemoryStorage::new(), DEFAULT_CART_KEY)
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_add_from_menu() {
        let mut store = store();
        let menu = Menu::cafe_erised();
        let mut out = Vec::new();

        add(&mut store, &menu, "c1", &mut out).unwrap();
        add(&mut store, &menu, "c1", &mut out).unwrap();

        assert_eq!(store.item_count(), 2);
        assert_eq!(store.total(), Price::new(1420));
        assert!(output(out).contains("Added Butterbeer (now 2 in cart)"));
    }

    #[test]
    fn test_add_unknown_item() {
        let mut store = store();
        let result = add(&mut store, &Menu::cafe_erised(), "zz", &mut Vec::new());
        assert!(matches!(result, Err(CliError::UnknownItem(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_invalid_id() {
        let result = add(&mut store(), &Menu::cafe_erised(), "  ", &mut Vec::new());
        assert!(matches!(result, Err(CliError::InvalidProductId(_))));
    }

    #[test]
    fn test_set_and_remove() {
        let mut store = store();
        let menu = Menu::cafe_erised();
        add(&mut store, &menu, "m2", &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        set(&mut store, "m2", 4, &mut out).unwrap();
        assert_eq!(store.item_count(), 4);

        set(&mut store, "m2", -1, &mut out).unwrap();
        assert!(store.is_empty());

        remove(&mut store, "m2", &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("Chocolate Wands (5pcs): 4 in cart"));
        assert!(text.contains("Removed Chocolate Wands (5pcs)"));
        assert!(text.contains("m2 is not in your cart"));
    }

    #[test]
    fn test_show() {
        let mut store = store();
        let mut out = Vec::new();
        show(&store, "Rs", &mut out).unwrap();
        assert_eq!(output(out), "Your cart is empty\n");

        let menu = Menu::cafe_erised();
        add(&mut store, &menu, "c1", &mut Vec::new()).unwrap();
        add(&mut store, &menu, "m2", &mut Vec::new()).unwrap();
        let mut out = Vec::new();
        show(&store, "Rs", &mut out).unwrap();
        assert!(output(out).contains("Subtotal: Rs 960 (2 items)"));
    }

    #[test]
    fn test_checkout_requires_items() {
        let checkout = Checkout::new(CheckoutConfig::default());
        let result = super::checkout(&store(), &checkout, &mut Vec::new());
        assert!(matches!(result, Err(CliError::EmptyCart)));
    }

    #[test]
    fn test_checkout_prints_link() {
        let mut store = store();
        add(&mut store, &Menu::cafe_erised(), "h1", &mut Vec::new()).unwrap();
        let checkout = Checkout::new(CheckoutConfig::default());

        let mut out = Vec::new();
        super::checkout(&store, &checkout, &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("1x Butterscotch Firebolt (Rs 480)"));
        assert!(text.contains("https://wa.me/923167059804?text="));
    }

    #[test]
    fn test_clear() {
        let mut store = store();
        add(&mut store, &Menu::cafe_erised(), "h1", &mut Vec::new()).unwrap();
        let mut out = Vec::new();
        clear(&mut store, &mut out).unwrap();
        assert!(store.is_empty());
        assert_eq!(output(out), "Cart cleared\n");
    }
}
