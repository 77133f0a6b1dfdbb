use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("menu file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from PDF: {0}")]
    Pdf(#[from] pdf_extract::OutputError),

    #[error("failed to download menu: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PDF extraction worker failed: {0}")]
    Extraction(String),

    #[error("failed to serialize catalog: {0}")]
    Json(#[from] serde_json::Error),
}

impl MenuError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
