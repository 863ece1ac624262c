//! Maps raw field fragments to a [`SiteRecord`], rejecting leftovers.

use std::sync::LazyLock;

use regex::Regex;
use rxdrop_core::SiteRecord;

static NAME_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*Bus Name\s*").expect("valid regex"));
static DISTANCE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*Dist\s*").expect("valid regex"));

/// Field fragments as pulled from a row or a text chunk, before cleanup.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RawSite<'a> {
    pub name: &'a str,
    pub address1: &'a str,
    pub address2: &'a str,
    pub city_state_zip: &'a str,
    pub distance: &'a str,
    pub map_url: Option<&'a str>,
}

/// Clean `raw` into a [`SiteRecord`].
///
/// Returns `None` when the cleaned name is empty, two characters or fewer,
/// or contains "map" in any case. Those are header or map-link cells that
/// survived row classification.
pub(crate) fn normalize_site(raw: RawSite<'_>) -> Option<SiteRecord> {
    let name = NAME_LABEL_RE.replace(raw.name, "").trim().to_string();
    if !is_plausible_name(&name) {
        tracing::trace!(name, "rejected site name");
        return None;
    }

    Some(SiteRecord {
        name,
        address1: raw.address1.trim().to_string(),
        address2: raw.address2.trim().to_string(),
        city_state_zip: raw.city_state_zip.trim().to_string(),
        distance: DISTANCE_LABEL_RE
            .replace(raw.distance, "")
            .trim()
            .to_string(),
        map_url: raw.map_url.map(str::trim).unwrap_or_default().to_string(),
    })
}

fn is_plausible_name(name: &str) -> bool {
    name.chars().count() > 2 && !name.to_lowercase().contains("map")
}
