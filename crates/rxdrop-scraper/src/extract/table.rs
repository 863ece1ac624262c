//! Row classification and column mapping for tabular result pages.

use rxdrop_core::SiteRecord;

use super::is_header_text;
use super::normalize::{normalize_site, RawSite};
use crate::document::{CellHandle, RowHandle};

/// Layout of a data row, chosen solely by how many cells it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    /// `Bus Name | Addr 1 | Addr 2 | City, State Zip | Dist | Map` (and wider).
    SixColumn,
    /// `Bus Name | Addr 1 | City, State Zip | Dist | Map`.
    FiveColumn,
    /// `Bus Name | Address | City, State Zip | Dist`.
    FourColumn,
    /// Two or three cells, mapped positionally like the six-column layout.
    Irregular,
}

impl RowShape {
    /// Classify a row by cell count. Fewer than two cells is not a data row.
    #[must_use]
    pub fn classify(cell_count: usize) -> Option<Self> {
        match cell_count {
            n if n >= 6 => Some(Self::SixColumn),
            5 => Some(Self::FiveColumn),
            4 => Some(Self::FourColumn),
            2 | 3 => Some(Self::Irregular),
            _ => None,
        }
    }
}

/// Convert candidate rows into site records, in row order.
///
/// Empty rows, header rows, rows with fewer than two cells and rows whose
/// name fails normalization are skipped; none of them abort extraction.
pub(crate) fn extract_table_rows(rows: &[RowHandle]) -> Vec<SiteRecord> {
    let mut sites = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let cells = row.cells();
        if cells.is_empty() {
            tracing::trace!(row = index, "skipping row without cells");
            continue;
        }
        if is_header_text(row.text()) {
            tracing::debug!(row = index, "skipping header row");
            continue;
        }
        let Some(shape) = RowShape::classify(cells.len()) else {
            tracing::trace!(row = index, cells = cells.len(), "skipping single-cell row");
            continue;
        };

        match normalize_site(map_cells(shape, cells)) {
            Some(site) => {
                tracing::trace!(
                    row = index,
                    ?shape,
                    name = site.name.as_str(),
                    "extracted site"
                );
                sites.push(site);
            }
            None => tracing::debug!(row = index, ?shape, "skipping row with invalid name"),
        }
    }

    sites
}

fn map_cells(shape: RowShape, cells: &[CellHandle]) -> RawSite<'_> {
    let text = |i: usize| cells.get(i).map_or("", CellHandle::text);

    match shape {
        RowShape::SixColumn => RawSite {
            name: text(0),
            address1: text(1),
            address2: text(2),
            city_state_zip: text(3),
            distance: text(4),
            map_url: cells.get(5).and_then(CellHandle::link),
        },
        RowShape::FiveColumn | RowShape::FourColumn => RawSite {
            name: text(0),
            address1: text(1),
            address2: "",
            city_state_zip: text(2),
            distance: text(3),
            map_url: None,
        },
        RowShape::Irregular => RawSite {
            name: text(0),
            address1: text(1),
            address2: text(2),
            city_state_zip: text(3),
            distance: text(4),
            map_url: None,
        },
    }
}
