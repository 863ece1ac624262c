//! Disposal-site extraction engine.
//!
//! Runs a fixed sequence of strategies over a [`DocumentView`] and returns
//! the first non-empty result:
//!
//! ```text
//! Start -> ProbeSelector -> TableExtract -> Done
//!               |                |
//!               +-> TextFallback <+
//!                        |
//!                        +-> Done
//! ```
//!
//! A selector probe that finds no data rows, or a table that yields no valid
//! records, falls through to free-text matching. An empty result after every
//! strategy is a normal outcome ("no sites near this location"), not an
//! error. Extraction is a pure function of the document: it holds no state
//! between calls and never mutates the page.

mod normalize;
mod probe;
mod table;
mod text;

use rxdrop_core::SiteRecord;
use serde::Serialize;

use crate::document::DocumentView;
use probe::{probe_selectors, ProbeHit};
use table::extract_table_rows;
use text::{extract_keyword_anchored, extract_labeled_segments};

pub use probe::ROW_SELECTORS;
pub use table::RowShape;

/// Lower-case fragments that identify table headings rather than data.
pub const HEADER_MARKERS: [&str; 4] = [
    "bus name",
    "addr 1",
    "public controlled substance",
    "map mapbus",
];

pub(crate) fn is_header_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    HEADER_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Non-fatal conditions met on the way to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Degradation {
    #[error("no row selector matched any data rows")]
    NoSelectorMatch,

    #[error("selector \"{selector}\" matched rows but none produced a valid site")]
    EmptyTableResult { selector: &'static str },

    #[error("neither table nor text extraction found any sites")]
    NoExtractableData,
}

/// Which strategy produced the final records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "camelCase")]
pub enum ExtractionSource {
    Table { selector: &'static str },
    LabeledSegment,
    KeywordAnchored,
    Nothing,
}

/// Records plus a trace of how they were obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub records: Vec<SiteRecord>,
    pub source: ExtractionSource,
    /// Fallback triggers in the order they occurred.
    pub degradations: Vec<Degradation>,
}

enum Stage {
    Start,
    ProbeSelector,
    TableExtract(ProbeHit),
    TextFallback,
    Done {
        records: Vec<SiteRecord>,
        source: ExtractionSource,
    },
}

impl Stage {
    fn advance<D: DocumentView + ?Sized>(
        self,
        document: &D,
        degradations: &mut Vec<Degradation>,
    ) -> Stage {
        match self {
            Stage::Start => Stage::ProbeSelector,
            Stage::ProbeSelector => match probe_selectors(document) {
                Some(hit) => {
                    tracing::debug!(
                        selector = hit.selector,
                        rows = hit.score,
                        "using row selector"
                    );
                    Stage::TableExtract(hit)
                }
                None => {
                    degradations.push(Degradation::NoSelectorMatch);
                    Stage::TextFallback
                }
            },
            Stage::TableExtract(hit) => {
                let records = extract_table_rows(&hit.rows);
                if records.is_empty() {
                    degradations.push(Degradation::EmptyTableResult {
                        selector: hit.selector,
                    });
                    Stage::TextFallback
                } else {
                    Stage::Done {
                        records,
                        source: ExtractionSource::Table {
                            selector: hit.selector,
                        },
                    }
                }
            }
            Stage::TextFallback => {
                let text = document.full_text();

                let labeled = extract_labeled_segments(&text);
                if !labeled.is_empty() {
                    return Stage::Done {
                        records: labeled,
                        source: ExtractionSource::LabeledSegment,
                    };
                }

                let anchored = extract_keyword_anchored(&text);
                if !anchored.is_empty() {
                    return Stage::Done {
                        records: anchored,
                        source: ExtractionSource::KeywordAnchored,
                    };
                }

                degradations.push(Degradation::NoExtractableData);
                Stage::Done {
                    records: Vec::new(),
                    source: ExtractionSource::Nothing,
                }
            }
            done @ Stage::Done { .. } => done,
        }
    }
}

/// Extract disposal sites from `document`, reporting the strategy used.
pub fn extract_with_report<D: DocumentView + ?Sized>(document: &D) -> Extraction {
    let mut degradations = Vec::new();
    let mut stage = Stage::Start;

    loop {
        stage = match stage.advance(document, &mut degradations) {
            Stage::Done { records, source } => {
                for reason in &degradations {
                    tracing::debug!(%reason, "extraction fell back");
                }
                tracing::debug!(?source, count = records.len(), "extraction finished");
                return Extraction {
                    records,
                    source,
                    degradations,
                };
            }
            next => next,
        };
    }
}

/// Extract disposal sites from `document`.
///
/// Always returns a list; an empty list means the page lists no sites.
pub fn extract<D: DocumentView + ?Sized>(document: &D) -> Vec<SiteRecord> {
    extract_with_report(document).records
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::document::{CellHandle, DocumentError, RowHandle};

    #[derive(Default)]
    struct Fixture {
        rows: HashMap<&'static str, Vec<RowHandle>>,
        text: String,
    }

    impl Fixture {
        fn with_rows(selectors: &[&'static str], rows: &[RowHandle]) -> Self {
            Self {
                rows: selectors.iter().map(|s| (*s, rows.to_vec())).collect(),
                text: String::new(),
            }
        }

        fn with_text(text: &str) -> Self {
            Self {
                rows: HashMap::new(),
                text: text.to_string(),
            }
        }
    }

    impl DocumentView for Fixture {
        fn query_all(&self, selector: &str) -> Result<Vec<RowHandle>, DocumentError> {
            Ok(self.rows.get(selector).cloned().unwrap_or_default())
        }

        fn full_text(&self) -> String {
            self.text.clone()
        }
    }

    fn row(texts: &[&str]) -> RowHandle {
        RowHandle::from_cells(texts.iter().map(|t| CellHandle::new(*t)).collect())
    }

    fn header() -> RowHandle {
        RowHandle::from_cells(
            ["Bus Name", "Addr 1", "Addr 2", "City, State Zip", "Dist", "Map"]
                .into_iter()
                .map(CellHandle::new)
                .collect(),
        )
    }

    #[test]
    fn header_marker_detection_is_case_insensitive() {
        assert!(is_header_text("BUS NAME"));
        assert!(is_header_text("xx Addr 1 yy"));
        assert!(is_header_text("Public Controlled Substance Disposal"));
        assert!(is_header_text("Map MapBus"));
        assert!(!is_header_text("ABC Pharmacy 123 Main St"));
    }

    #[test]
    fn table_rows_win_when_present() {
        let rows = [
            header(),
            row(&["ABC Pharmacy", "123 Main St", "", "Oklahoma City, OK 73120", "2.3 miles", ""]),
        ];
        let doc = Fixture::with_rows(&["table tbody tr", "table tr", "tr"], &rows);

        let extraction = extract_with_report(&doc);
        assert_eq!(
            extraction.source,
            ExtractionSource::Table {
                selector: "table tbody tr"
            }
        );
        assert!(extraction.degradations.is_empty());
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].name, "ABC Pharmacy");
    }

    #[test]
    fn header_only_table_with_plain_text_yields_empty_success() {
        let mut doc = Fixture::with_rows(&["table tbody tr", "table tr", "tr"], &[header()]);
        doc.text = "Bus Name Addr 1 Addr 2 City, State Zip Dist Map".to_string();

        let extraction = extract_with_report(&doc);
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.source, ExtractionSource::Nothing);
        assert_eq!(
            extraction.degradations,
            vec![
                Degradation::NoSelectorMatch,
                Degradation::NoExtractableData
            ]
        );
    }

    #[test]
    fn rows_without_valid_names_fall_back_to_text() {
        let rows = [row(&["Map", "123 Main St"]), row(&["OK", "456 Oak Ave"])];
        let mut doc = Fixture::with_rows(&["tr"], &rows);
        doc.text = "Public Controlled Substance Disposal Locations: Bus NameXYZ PHARMACYAddr 1100 MAIN STCity, State ZipOKC, OK 73120Dist1.2 miles".to_string();

        let extraction = extract_with_report(&doc);
        assert_eq!(extraction.source, ExtractionSource::LabeledSegment);
        assert_eq!(
            extraction.degradations,
            vec![Degradation::EmptyTableResult { selector: "tr" }]
        );
        assert_eq!(extraction.records[0].name, "XYZ PHARMACY");
        assert_eq!(extraction.records[0].address1, "100 MAIN ST");
    }

    #[test]
    fn keyword_strategy_runs_when_labeled_section_is_absent() {
        let doc = Fixture::with_text("Nearby: CVS PHARMACY 456 OAK AVE TULSA, OK 74104 2.0 miles");

        let extraction = extract_with_report(&doc);
        assert_eq!(extraction.source, ExtractionSource::KeywordAnchored);
        assert_eq!(extraction.degradations, vec![Degradation::NoSelectorMatch]);
        assert_eq!(extraction.records.len(), 1);
        let site = &extraction.records[0];
        assert_eq!(site.name, "CVS PHARMACY");
        assert_eq!(site.address1, "456 OAK AVE");
        assert!(site.city_state_zip.ends_with("TULSA, OK 74104"));
        assert_eq!(site.distance, "2.0 miles");
        assert_eq!(site.map_url, "");
    }

    #[test]
    fn labeled_strategy_takes_precedence_over_keyword_strategy() {
        let doc = Fixture::with_text(
            "Public Controlled Substance Disposal Locations: Bus NameXYZ PHARMACYAddr 1100 MAIN STCity, State ZipOKC, OK 73120Dist1.2 miles",
        );
        let extraction = extract_with_report(&doc);
        assert_eq!(extraction.source, ExtractionSource::LabeledSegment);
        assert_eq!(extraction.records.len(), 1);
    }

    #[test]
    fn empty_document_is_not_an_error() {
        let doc = Fixture::default();
        assert!(extract(&doc).is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let rows = [
            row(&["First Pharmacy", "1 A St", "Tulsa, OK 74104", "1 mile"]),
            row(&["Second Pharmacy", "2 B St", "Tulsa, OK 74105", "2 miles"]),
        ];
        let doc = Fixture::with_rows(&["table tr", "tr"], &rows);
        assert_eq!(extract(&doc), extract(&doc));
        assert_eq!(extract(&doc).len(), 2);
    }

    #[test]
    fn report_serializes_strategy_and_degradations() {
        let doc = Fixture::with_text("Nearby: CVS PHARMACY 456 OAK AVE TULSA, OK 74104 2.0 miles");
        let json = serde_json::to_value(extract_with_report(&doc)).unwrap();
        assert_eq!(json["source"]["strategy"], "keywordAnchored");
        assert_eq!(json["degradations"][0]["kind"], "noSelectorMatch");
        assert_eq!(json["records"][0]["address1"], "456 OAK AVE");
    }

    #[test]
    fn engine_output_names_are_always_plausible() {
        let rows = [
            row(&["", "1 A St"]),
            row(&["ab", "1 A St"]),
            row(&["Mapco Express", "1 A St"]),
            row(&["Bus Name  ", "1 A St"]),
            row(&["Good Drug", "1 A St"]),
        ];
        let doc = Fixture::with_rows(&["tr"], &rows);
        for site in extract(&doc) {
            assert!(site.name.chars().count() > 2);
            assert!(!site.name.to_lowercase().contains("map"));
        }
    }
}
