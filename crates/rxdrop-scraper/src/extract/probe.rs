//! Picks the row selector that best isolates data rows on a page.

use super::is_header_text;
use crate::document::{DocumentView, RowHandle};

/// Row selectors in priority order, most specific first.
pub const ROW_SELECTORS: [&str; 4] = ["table tbody tr", "table tr", "tbody tr", "tr"];

/// Number of rows that have at least one cell and carry no header marker.
pub(crate) fn score_rows(rows: &[RowHandle]) -> usize {
    rows.iter()
        .filter(|row| !row.cells().is_empty() && !is_header_text(row.text()))
        .count()
}

/// Winning selector and the rows it matched.
#[derive(Debug)]
pub(crate) struct ProbeHit {
    pub selector: &'static str,
    pub score: usize,
    pub rows: Vec<RowHandle>,
}

/// Evaluate every candidate in [`ROW_SELECTORS`] and keep the best.
///
/// Only a strictly greater score displaces the current leader, so ties go
/// to the earlier, more specific selector. A selector the document cannot
/// evaluate scores zero. Returns `None` when nothing scores above zero.
pub(crate) fn probe_selectors<D: DocumentView + ?Sized>(document: &D) -> Option<ProbeHit> {
    let mut best: Option<ProbeHit> = None;

    for selector in ROW_SELECTORS {
        let rows = match document.query_all(selector) {
            Ok(rows) => rows,
            Err(err) => {
                tracing::debug!(selector, error = %err, "selector failed; scoring as zero");
                continue;
            }
        };

        let score = score_rows(&rows);
        tracing::debug!(selector, score, "probed row selector");

        if score > best.as_ref().map_or(0, |hit| hit.score) {
            best = Some(ProbeHit {
                selector,
                score,
                rows,
            });
        }
    }

    best
}
