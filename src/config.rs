use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;
use reqwest::Url;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid menu source {0:?}, expected CATEGORY=LOCATION")]
pub struct InvalidSource(pub String);

/// Where a menu PDF lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    File(PathBuf),
    Remote(Url),
}

impl FromStr for SourceLocation {
    type Err = InvalidSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidSource(s.to_string()));
        }
        let lower = trimmed.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(trimmed).map_err(|_| InvalidSource(s.to_string()))?;
            return Ok(Self::Remote(url));
        }
        Ok(Self::File(PathBuf::from(trimmed)))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// A menu document and the category label its items get, e.g. `Veg=veg.pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSource {
    pub category: String,
    pub location: SourceLocation,
}

impl FromStr for MenuSource {
    type Err = InvalidSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, location) = s
            .split_once('=')
            .ok_or_else(|| InvalidSource(s.to_string()))?;
        let category = category.trim();
        if category.is_empty() {
            return Err(InvalidSource(s.to_string()));
        }
        Ok(Self {
            category: category.to_string(),
            location: location.parse()?,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct ConvertConfig {
    /// Menu PDF as CATEGORY=PATH or CATEGORY=URL; repeat for each category, in output order
    #[arg(
        long = "menu",
        value_name = "CATEGORY=LOCATION",
        default_values = ["Veg=veg.pdf", "Non-Veg=nonveg.pdf"]
    )]
    pub sources: Vec<MenuSource>,

    /// Where to write the JSON catalog
    #[arg(long, env = "MENU_OUTPUT", default_value = "frontend/src/data/menu.json")]
    pub output: PathBuf,

    /// Also write the raw extracted text of each menu into this directory
    #[arg(long)]
    pub debug_dir: Option<PathBuf>,

    /// How many items to list after writing (default: all)
    #[arg(long)]
    pub show: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Catalog served at /api/menu
    #[arg(long, default_value = "backend/menu.json")]
    pub menu_file: PathBuf,

    /// Append-only log of posted orders
    #[arg(long, default_value = "backend/orders.log")]
    pub order_log: PathBuf,

    /// Built frontend, served for every other route
    #[arg(long, default_value = "frontend/build")]
    pub static_dir: PathBuf,

    /// Directory served under /pdfs
    #[arg(long, default_value = "frontend/public")]
    pub pdf_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_source() {
        let source: MenuSource = "Non-Veg=menus/nonveg.pdf".parse().unwrap();
        assert_eq!(source.category, "Non-Veg");
        assert_eq!(
            source.location,
            SourceLocation::File(PathBuf::from("menus/nonveg.pdf"))
        );
    }

    #[test]
    fn parses_remote_source() {
        let source: MenuSource = "Veg=https://example.com/veg.pdf".parse().unwrap();
        assert!(matches!(source.location, SourceLocation::Remote(ref url) if url.path() == "/veg.pdf"));
    }

    #[test]
    fn rejects_malformed_sources() {
        assert!("veg.pdf".parse::<MenuSource>().is_err());
        assert!("=veg.pdf".parse::<MenuSource>().is_err());
        assert!("Veg=".parse::<MenuSource>().is_err());
    }
}
