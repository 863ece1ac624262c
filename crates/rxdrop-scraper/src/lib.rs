pub mod document;
pub mod error;
pub mod extract;
pub mod lookup;

pub use document::{CellHandle, DocumentError, DocumentView, HtmlDocument, RowHandle};
pub use error::{FailureKind, LookupError};
pub use extract::{
    extract, extract_with_report, Degradation, Extraction, ExtractionSource, RowShape,
    ROW_SELECTORS,
};
pub use lookup::{
    DisposalSiteLookup, HttpResultsSource, LookupReport, ResultsPageSource, NO_RESULTS_MARKERS,
};
