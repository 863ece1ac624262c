//! [`DocumentView`] over a static HTML snapshot, backed by the `scraper` crate.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{CellHandle, DocumentError, DocumentView, RowHandle};

static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("valid cell selector"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));
static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid body selector"));

/// A parsed results page.
///
/// Text is gathered the way a browser's `textContent` does: every
/// descendant text node concatenated with no separator. Cell texts are
/// trimmed; row and page texts are not.
pub struct HtmlDocument {
    html: Html,
    base_url: Option<Url>,
}

impl HtmlDocument {
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            base_url: None,
        }
    }

    /// Parse `source` and resolve relative link targets against `base_url`,
    /// matching what a browser reports for `a.href`.
    #[must_use]
    pub fn parse_with_base_url(source: &str, base_url: Url) -> Self {
        Self {
            html: Html::parse_document(source),
            base_url: Some(base_url),
        }
    }

    fn row_handle(&self, row: ElementRef<'_>) -> RowHandle {
        let cells = row
            .select(&CELL_SELECTOR)
            .map(|cell| self.cell_handle(cell))
            .collect();
        RowHandle::new(cells, row.text().collect::<String>())
    }

    fn cell_handle(&self, cell: ElementRef<'_>) -> CellHandle {
        let text = cell.text().collect::<String>().trim().to_string();
        let href = cell
            .select(&ANCHOR_SELECTOR)
            .next()
            .and_then(|a| a.value().attr("href"));

        match href {
            Some(href) => CellHandle::with_link(text, self.resolve_link(href)),
            None => CellHandle::new(text),
        }
    }

    fn resolve_link(&self, href: &str) -> String {
        let href = href.trim();
        self.base_url
            .as_ref()
            .and_then(|base| base.join(href).ok())
            .map_or_else(|| href.to_string(), String::from)
    }
}

impl DocumentView for HtmlDocument {
    fn query_all(&self, selector: &str) -> Result<Vec<RowHandle>, DocumentError> {
        let parsed = Selector::parse(selector).map_err(|e| DocumentError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;

        Ok(self
            .html
            .select(&parsed)
            .map(|row| self.row_handle(row))
            .collect())
    }

    fn full_text(&self) -> String {
        match self.html.select(&BODY_SELECTOR).next() {
            Some(body) => body.text().collect(),
            None => self.html.root_element().text().collect(),
        }
    }
}
