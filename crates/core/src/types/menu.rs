//! The café menu.
//!
//! The menu is the catalog the cart is filled from. The house menu is built
//! in; alternative menus can be loaded from YAML.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Errors that can occur when loading a [`Menu`].
#[derive(thiserror::Error, Debug)]
pub enum MenuError {
    /// The YAML document could not be parsed.
    #[error("invalid menu document: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Two items share the same id.
    #[error("duplicate menu item {0}")]
    DuplicateItem(ProductId),
}

/// Menu section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    /// Hot drinks.
    HotPotions,
    /// Iced drinks.
    ColdElixirs,
    /// Food and desserts.
    ForTheMuggles,
}

impl MenuCategory {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::HotPotions, Self::ColdElixirs, Self::ForTheMuggles];

    /// Heading shown on the menu.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::HotPotions => "Hot Potions",
            Self::ColdElixirs => "Cold Elixirs",
            Self::ForTheMuggles => "For The Muggles",
        }
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single orderable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique id, also the cart line id.
    pub id: ProductId,
    /// Display name copied into the cart line.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Short blurb shown under the name. Optional in YAML.
    #[serde(default)]
    pub description: String,
    /// Section the item is listed under.
    pub category: MenuCategory,
}

/// An ordered list of menu items with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    items: Vec<MenuItem>,
}

#[derive(Deserialize)]
struct MenuDocument {
    items: Vec<MenuItem>,
}

impl Menu {
    /// Build a menu from items.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::DuplicateItem`] if two items share an id.
    pub fn new(items: Vec<MenuItem>) -> Result<Self, MenuError> {
        for (index, item) in items.iter().enumerate() {
            if items.iter().take(index).any(|prev| prev.id == item.id) {
                return Err(MenuError::DuplicateItem(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Parse a menu from a YAML document with a top-level `items` list.
    ///
    /// ```yaml
    /// items:
    ///   - id: c1
    ///     name: Butterbeer
    ///     price: 710
    ///     category: cold_elixirs
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or has duplicate ids.
    pub fn from_yaml(yaml: &str) -> Result<Self, MenuError> {
        let document: MenuDocument = serde_yaml::from_str(yaml)?;
        Self::new(document.items)
    }

    /// The Cafe Erised house menu.
    #[must_use]
    pub fn cafe_erised() -> Self {
        let items = HOUSE_MENU
            .iter()
            .filter_map(|&(id, category, name, price, description)| {
                Some(MenuItem {
                    id: ProductId::parse(id).ok()?,
                    name: name.to_owned(),
                    price: Price::new(price),
                    description: description.to_owned(),
                    category,
                })
            })
            .collect();
        Self { items }
    }

    /// All items in menu order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Look up an item by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&MenuItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Items in one category, in menu order.
    pub fn by_category(&self, category: MenuCategory) -> impl Iterator<Item = &MenuItem> {
        self.items
            .iter()
            .filter(move |item| item.category == category)
    }

    /// Categories that have at least one item, in display order.
    #[must_use]
    pub fn categories(&self) -> Vec<MenuCategory> {
        MenuCategory::ALL
            .into_iter()
            .filter(|&category| self.by_category(category).next().is_some())
            .collect()
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::cafe_erised()
    }
}

const HOUSE_MENU: &[(&str, MenuCategory, &str, u64, &str)] = &[
    (
        "h1",
        MenuCategory::HotPotions,
        "Butterscotch Firebolt",
        480,
        "A warming blend of rich butterscotch and steamed milk with a hint of cinnamon.",
    ),
    (
        "h2",
        MenuCategory::HotPotions,
        "London Fog Earl Grey",
        350,
        "Classic Earl Grey tea steeped in steamed vanilla milk and lavender syrup.",
    ),
    (
        "h3",
        MenuCategory::HotPotions,
        "Rose Vanilla Sleep Latte",
        420,
        "Decaffeinated espresso infused with calming rose water and sweet vanilla.",
    ),
    (
        "c1",
        MenuCategory::ColdElixirs,
        "Butterbeer",
        710,
        "The wizarding classic. Rich butterscotch cream soda topped with cold foam.",
    ),
    (
        "c2",
        MenuCategory::ColdElixirs,
        "Creme Brulee Latte",
        680,
        "Iced espresso with caramelized sugar syrup and a torched sugar topping.",
    ),
    (
        "c3",
        MenuCategory::ColdElixirs,
        "Brown Sugar Shaken Espresso",
        520,
        "Vigourously shaken espresso with dark brown sugar and a splash of oat milk.",
    ),
    (
        "m1",
        MenuCategory::ForTheMuggles,
        "Spanish Latte",
        520,
        "A sweet, creamy classic made with sweetened condensed milk and rich espresso.",
    ),
    (
        "m2",
        MenuCategory::ForTheMuggles,
        "Chocolate Wands (5pcs)",
        250,
        "Crispy biscuit sticks heavily coated in premium dark Belgian chocolate.",
    ),
];
