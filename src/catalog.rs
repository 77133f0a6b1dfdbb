use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Client;

use crate::MenuItem;
use crate::config::MenuSource;
use crate::error::MenuError;
use crate::extract::load_menu_text;
use crate::parser::parse_menu_text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: String,
    pub items: usize,
    /// False when the document could not be read at all.
    pub loaded: bool,
}

#[derive(Debug, Default)]
pub struct CatalogReport {
    pub items: Vec<MenuItem>,
    pub categories: Vec<CategorySummary>,
}

/// Gives items the ids `1..=N` in their current order.
pub fn renumber(items: &mut [MenuItem]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.id = index as u32 + 1;
    }
}

/// Concatenates per-category results in order and renumbers them globally.
pub fn assemble(parts: Vec<Vec<MenuItem>>) -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = parts.into_iter().flatten().collect();
    renumber(&mut items);
    items
}

/// Writes the catalog as indented JSON, creating parent directories first.
/// The whole document is rendered before the file is touched.
pub fn write_catalog(path: &Path, items: &[MenuItem]) -> Result<(), MenuError> {
    let json = serde_json::to_string_pretty(items)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| MenuError::io(parent, err))?;
    }
    fs::write(path, json).map_err(|err| MenuError::io(path, err))
}

pub fn debug_file_name(category: &str) -> String {
    format!("debug_{}.txt", category.to_lowercase().replace('-', "_"))
}

/// Dumps the raw extracted text of one menu so the parser's input can be
/// inspected by hand.
pub fn write_debug_text(dir: &Path, category: &str, text: &str) -> Result<PathBuf, MenuError> {
    fs::create_dir_all(dir).map_err(|err| MenuError::io(dir, err))?;
    let path = dir.join(debug_file_name(category));
    fs::write(&path, text).map_err(|err| MenuError::io(&path, err))?;
    Ok(path)
}

/// Reads and parses every source in order. A source that cannot be loaded is
/// logged and contributes no items; it never aborts the run.
pub async fn build_catalog(
    client: &Client,
    sources: &[MenuSource],
    debug_dir: Option<&Path>,
) -> CatalogReport {
    let mut parts = Vec::with_capacity(sources.len());
    let mut categories = Vec::with_capacity(sources.len());

    for source in sources {
        tracing::info!(category = %source.category, source = %source.location, "processing menu");

        let text = match load_menu_text(client, &source.location).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(category = %source.category, "skipping menu: {err}");
                categories.push(CategorySummary {
                    category: source.category.clone(),
                    items: 0,
                    loaded: false,
                });
                continue;
            }
        };

        if let Some(dir) = debug_dir {
            match write_debug_text(dir, &source.category, &text) {
                Ok(path) => tracing::info!("saved raw text to {}", path.display()),
                Err(err) => tracing::warn!("could not save raw text: {err}"),
            }
        }

        let items = parse_menu_text(&text, &source.category);
        tracing::info!(category = %source.category, items = items.len(), "found items");
        categories.push(CategorySummary {
            category: source.category.clone(),
            items: items.len(),
            loaded: true,
        });
        parts.push(items);
    }

    CatalogReport {
        items: assemble(parts),
        categories,
    }
}
