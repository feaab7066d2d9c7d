//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::Path;

use tracing::debug;

use lvx_core::{load_pages, pages_from_text, PageText};

/// Input formats accepted by `process` and `batch`.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Check if a path has a supported input extension.
pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension_of(path).as_str())
}

/// Read the pages of an input file.
///
/// PDFs go through the PDF extractor; `.txt` files are split on form feeds.
pub fn read_pages(path: &Path) -> anyhow::Result<Vec<PageText>> {
    let extension = extension_of(path);

    let pages = match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            load_pages(&data)?
        }
        "txt" => pages_from_text(&fs::read_to_string(path)?),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    debug!("Read {} pages from {}", pages.len(), path.display());
    Ok(pages)
}
