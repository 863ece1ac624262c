//! Read-only view of a rendered results page.
//!
//! The extraction engine never touches a live browser or a parsed DOM
//! directly; it only consumes [`DocumentView`]. Anything that can answer
//! row queries and hand back the page text (a headless-browser adapter, the
//! [`HtmlDocument`] snapshot parser, an in-memory test fixture) can be
//! extracted from.

mod html;

pub use html::HtmlDocument;

/// Errors raised by a [`DocumentView`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("document unavailable: {0}")]
    Unavailable(String),
}

/// Capability the extraction engine consumes.
pub trait DocumentView {
    /// All elements matching `selector`, in document order, as candidate rows.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the selector cannot be evaluated.
    fn query_all(&self, selector: &str) -> Result<Vec<RowHandle>, DocumentError>;

    /// The entire rendered text of the page.
    fn full_text(&self) -> String;
}

/// One candidate row: its cell-like children and its full text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowHandle {
    cells: Vec<CellHandle>,
    text: String,
}

impl RowHandle {
    #[must_use]
    pub fn new(cells: Vec<CellHandle>, text: impl Into<String>) -> Self {
        Self {
            cells,
            text: text.into(),
        }
    }

    /// Build a row whose text is the concatenation of its cell texts.
    #[must_use]
    pub fn from_cells(cells: Vec<CellHandle>) -> Self {
        let text = cells.iter().map(CellHandle::text).collect::<Vec<_>>().join(" ");
        Self { cells, text }
    }

    #[must_use]
    pub fn cells(&self) -> &[CellHandle] {
        &self.cells
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One `td`/`th`-like cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellHandle {
    text: String,
    link: Option<String>,
}

impl CellHandle {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
        }
    }

    #[must_use]
    pub fn with_link(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(link.into()),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Target of the first anchor inside the cell, if any.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }
}
