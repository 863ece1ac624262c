//! `rxdrop extract`: run the extraction engine over a saved results page.

use std::path::Path;

use anyhow::Context;
use rxdrop_scraper::{extract_with_report, HtmlDocument};

/// Parse the page at `file` and print its sites as JSON on stdout.
///
/// With `report` set, prints the full extraction report (strategy and
/// fallbacks) instead of just the records.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the output cannot be
/// serialized. An empty page is not an error.
pub(crate) fn run_extract(file: &Path, base_url: Option<url::Url>, report: bool) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read results page {}", file.display()))?;

    let document = match base_url {
        Some(base) => HtmlDocument::parse_with_base_url(&html, base),
        None => HtmlDocument::parse(&html),
    };
    let extraction = extract_with_report(&document);
    tracing::info!(
        file = %file.display(),
        count = extraction.records.len(),
        source = ?extraction.source,
        "extracted disposal sites"
    );

    let output = if report {
        serde_json::to_string_pretty(&extraction)?
    } else {
        serde_json::to_string_pretty(&extraction.records)?
    };
    println!("{output}");
    Ok(())
}
