//! Menu commands.
//!
//! # Usage
//!
//! ```bash
//! # List the house menu
//! erised menu
//!
//! # List a menu loaded from YAML
//! erised --menu seasonal.yaml menu
//! ```

use std::io::Write;
use std::path::Path;

use cafe_erised_core::Menu;

use super::CliError;

/// Load the menu from `path`, or the house menu when no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid menu.
pub fn load(path: Option<&Path>) -> Result<Menu, CliError> {
    let Some(path) = path else {
        return Ok(Menu::cafe_erised());
    };

    tracing::info!(path = %path.display(), "Loading menu from file");
    let content = std::fs::read_to_string(path)?;
    let menu = Menu::from_yaml(&content)?;
    tracing::info!(items = menu.items().len(), "Parsed menu");
    Ok(menu)
}

/// Print the menu grouped by category.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn show(menu: &Menu, currency: &str, out: &mut impl Write) -> Result<(), CliError> {
    for (index, category) in menu.categories().into_iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{category}")?;
        for item in menu.by_category(category) {
            writeln!(
                out,
                "  {:<4} {:<32} {currency} {}",
                item.id.as_str(),
                item.name,
                item.price
            )?;
            if !item.description.is_empty() {
                writeln!(out, "       {}", item.description)?;
            }
        }
    }
    Ok(())
}
