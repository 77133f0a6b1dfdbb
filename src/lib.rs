pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod parser;
pub mod server;

use serde::{Deserialize, Serialize};

pub use catalog::{assemble, build_catalog, write_catalog};
pub use error::MenuError;
pub use parser::{parse_menu_lines, parse_menu_text};

/// One dish in the website's menu catalog.
///
/// `description` and `image` stay empty; they are filled in by hand later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: u32,
    pub name: String,
    pub price: u32,
    pub description: String,
    pub category: String,
    pub image: String,
}

impl MenuItem {
    pub fn new(id: u32, name: impl Into<String>, price: u32, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            description: String::new(),
            category: category.into(),
            image: String::new(),
        }
    }
}
