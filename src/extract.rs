use std::time::Duration;

use reqwest::Client;

use crate::config::SourceLocation;
use crate::error::MenuError;

pub fn build_client() -> Result<Client, MenuError> {
    // Menu URLs are public downloads made from a one-shot CLI run: skip OS
    // proxy discovery and give up on a stalled server instead of hanging.
    let client = Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(60))
        .user_agent("cloud-kitchen-menu/0.1")
        .build()?;
    Ok(client)
}

pub async fn load_pdf_bytes(
    client: &Client,
    location: &SourceLocation,
) -> Result<Vec<u8>, MenuError> {
    match location {
        SourceLocation::File(path) => {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                return Err(MenuError::MissingFile(path.clone()));
            }
            tokio::fs::read(path)
                .await
                .map_err(|err| MenuError::io(path, err))
        }
        SourceLocation::Remote(url) => {
            let bytes = client
                .get(url.clone())
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            Ok(bytes.to_vec())
        }
    }
}

/// Extracts the text of every page. pdf-extract is blocking and can panic on
/// damaged files, so it runs on the blocking pool and a panic comes back as
/// [`MenuError::Extraction`].
pub async fn extract_pages(bytes: Vec<u8>) -> Result<Vec<String>, MenuError> {
    let pages = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    })
    .await
    .map_err(|err| MenuError::Extraction(err.to_string()))??;
    Ok(pages)
}

/// Every page is followed by a newline, so the last line of one page never
/// runs into the first line of the next.
pub fn join_pages(pages: &[String]) -> String {
    let mut text = String::with_capacity(pages.iter().map(|page| page.len() + 1).sum());
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text
}

pub async fn load_menu_text(
    client: &Client,
    location: &SourceLocation,
) -> Result<String, MenuError> {
    let bytes = load_pdf_bytes(client, location).await?;
    let pages = extract_pages(bytes).await?;
    let total = pages.len();
    tracing::info!(source = %location, pages = total, "found pages");
    for (index, page) in pages.iter().enumerate() {
        tracing::debug!(
            source = %location,
            lines = page.lines().count(),
            "processed page {}/{total}",
            index + 1
        );
    }
    Ok(join_pages(&pages))
}
