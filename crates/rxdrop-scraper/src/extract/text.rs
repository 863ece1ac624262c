//! Free-text fallback used when no table rows can be recovered.
//!
//! Two heuristics run over the page's rendered text:
//!
//! 1. **Labeled segments.** The listing section is split on its repeating
//!    `Bus Name` label and each chunk is read field by field using the
//!    `Addr 1` / `Addr 2` / `City, State Zip` / `Dist` labels.
//! 2. **Keyword anchors.** Every upper-case run ending in `PHARMACY` is
//!    treated as a name and a window of text around it is searched for an
//!    address, a city/state/zip and a distance.
//!
//! Both are pattern matches over unstructured text. They can mis-split or
//! repeat entries on unfamiliar layouts.

use std::sync::LazyLock;

use regex::Regex;
use rxdrop_core::SiteRecord;

use super::normalize::{normalize_site, RawSite};

const SECTION_HEADING: &str = "Public Controlled Substance Disposal Locations:";
const ENTRY_MARKER: &str = "Bus Name";
const FIELD_LABELS: [&str; 4] = ["Addr 1", "Addr 2", "City, State Zip", "Dist"];

const WINDOW_BEFORE: usize = 100;
const WINDOW_AFTER: usize = 200;

static SECTION_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n|\n[A-Z][a-z]+:|\n\s*\z").expect("valid regex"));

static ADDR1_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Addr 1\s*([0-9].*?)\s*(?:Addr 2|City, State Zip)").expect("valid regex")
});
static ADDR2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Addr 2(.*?)City, State Zip").expect("valid regex"));
static LABELED_CITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"City, State Zip\s*([A-Z][A-Za-z\s.,]*[0-9]{5})").expect("valid regex")
});
static LABELED_DIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Dist\s*([0-9.]+\s*miles?)").expect("valid regex"));

static PHARMACY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z\s&,.]+PHARMACY[A-Z\s&,.]*").expect("valid regex"));
static STREET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+[A-Z\s]+(?:AVE|ST|RD|DR|BLVD|WAY|LN|CT)").expect("valid regex")
});
static CITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z\s]+,\s*[A-Z]{2}\s*[0-9]{5}").expect("valid regex"));
static DIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9.]+\s*miles?").expect("valid regex"));

// ---------------------------------------------------------------------------
// Strategy 1: labeled segments
// ---------------------------------------------------------------------------

/// Parse the `Public Controlled Substance Disposal Locations:` section.
pub(crate) fn extract_labeled_segments(text: &str) -> Vec<SiteRecord> {
    let Some(section) = locate_section(text) else {
        return Vec::new();
    };
    tracing::debug!(section_len = section.len(), "found disposal locations section");

    section
        .split(ENTRY_MARKER)
        .filter(|chunk| !chunk.trim().is_empty())
        .filter_map(parse_labeled_chunk)
        .collect()
}

/// Text after the section heading, up to the next blank line, the next
/// `Word:` heading line, trailing whitespace, or the end of the text.
fn locate_section(text: &str) -> Option<&str> {
    let start = text.find(SECTION_HEADING)? + SECTION_HEADING.len();
    let rest = &text[start..];

    // The section holds at least one character before any terminator.
    let first_char_len = rest.chars().next()?.len_utf8();
    let end = SECTION_END_RE
        .find_at(rest, first_char_len)
        .map_or(rest.len(), |m| m.start());

    Some(&rest[..end])
}

/// A chunk with no field label is intro or trailing prose, not an entry.
fn parse_labeled_chunk(chunk: &str) -> Option<SiteRecord> {
    let Some(name_end) = FIELD_LABELS
        .iter()
        .filter_map(|label| chunk.find(label))
        .min()
    else {
        tracing::trace!(chunk, "skipping unlabeled chunk");
        return None;
    };

    let capture = |re: &Regex| {
        re.captures(chunk)
            .and_then(|caps| caps.get(1))
            .map_or("", |m| m.as_str())
    };

    normalize_site(RawSite {
        name: &chunk[..name_end],
        address1: capture(&ADDR1_RE),
        address2: capture(&ADDR2_RE),
        city_state_zip: capture(&LABELED_CITY_RE),
        distance: capture(&LABELED_DIST_RE),
        map_url: None,
    })
}

// ---------------------------------------------------------------------------
// Strategy 2: keyword anchors
// ---------------------------------------------------------------------------

/// Build one record per upper-case `... PHARMACY` run in `text`.
pub(crate) fn extract_keyword_anchored(text: &str) -> Vec<SiteRecord> {
    PHARMACY_RE
        .find_iter(text)
        .filter_map(|hit| {
            let window = surrounding_window(text, hit.start());
            let first = |re: &Regex| re.find(window).map_or("", |m| m.as_str());

            normalize_site(RawSite {
                name: hit.as_str(),
                address1: first(&STREET_RE),
                address2: "",
                city_state_zip: first(&CITY_RE),
                distance: first(&DIST_RE),
                map_url: None,
            })
        })
        .collect()
}

/// Up to `WINDOW_BEFORE` characters before byte offset `at` and
/// `WINDOW_AFTER` characters from it onwards.
fn surrounding_window(text: &str, at: usize) -> &str {
    let start = text[..at]
        .char_indices()
        .rev()
        .nth(WINDOW_BEFORE - 1)
        .map_or(0, |(i, _)| i);
    let end = text[at..]
        .char_indices()
        .nth(WINDOW_AFTER)
        .map_or(text.len(), |(i, _)| at + i);
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_C: &str = "Public Controlled Substance Disposal Locations: Bus NameXYZ PHARMACYAddr 1100 MAIN STCity, State ZipOKC, OK 73120Dist1.2 miles";

    #[test]
    fn labeled_segment_reads_every_field() {
        let sites = extract_labeled_segments(SCENARIO_C);
        assert_eq!(
            sites,
            vec![SiteRecord {
                name: "XYZ PHARMACY".to_string(),
                address1: "100 MAIN ST".to_string(),
                address2: String::new(),
                city_state_zip: "OKC, OK 73120".to_string(),
                distance: "1.2 miles".to_string(),
                map_url: String::new(),
            }]
        );
    }

    #[test]
    fn labeled_segment_splits_repeated_entries_and_reads_addr2() {
        let text = "Public Controlled Substance Disposal Locations:\
            Bus NameWALGREENS #4410Addr 11201 NW 63RD STAddr 2SUITE 100City, State ZipOKLAHOMA CITY, OK 73116Dist0.8 miles\
            Bus NameREASORS PHARMACYAddr 1200 E 2ND STCity, State ZipEDMOND, OK 73034Dist1 mile";
        let sites = extract_labeled_segments(text);
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].name, "WALGREENS #4410");
        assert_eq!(sites[0].address1, "1201 NW 63RD ST");
        assert_eq!(sites[0].address2, "SUITE 100");
        assert_eq!(sites[0].city_state_zip, "OKLAHOMA CITY, OK 73116");
        assert_eq!(sites[0].distance, "0.8 miles");
        assert_eq!(sites[1].name, "REASORS PHARMACY");
        assert_eq!(sites[1].address2, "");
        assert_eq!(sites[1].distance, "1 mile");
    }

    #[test]
    fn section_stops_at_blank_line() {
        let text = "Public Controlled Substance Disposal Locations: Bus NameXYZ PHARMACYAddr 1100 MAIN STCity, State ZipOKC, OK 73120Dist1.2 miles\n\nBus NameOTHER DRUGAddr 15 ELM STCity, State ZipOKC, OK 73120";
        let sites = extract_labeled_segments(text);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].name, "XYZ PHARMACY");
    }

    #[test]
    fn section_stops_at_next_heading_line() {
        let text = "Public Controlled Substance Disposal Locations: Bus NameXYZ PHARMACYAddr 1100 MAIN STCity, State ZipOKC, OK 73120\nDisclaimer: Bus NameIGNORED PHARMACY";
        let sites = extract_labeled_segments(text);
        assert_eq!(sites.len(), 1);
    }

    #[test]
    fn missing_heading_yields_nothing() {
        assert!(extract_labeled_segments("Bus NameXYZ PHARMACYAddr 1100 MAIN ST").is_empty());
        assert!(
            extract_labeled_segments("Public Controlled Substance Disposal Locations:").is_empty()
        );
    }

    #[test]
    fn labeled_chunk_without_valid_name_is_dropped() {
        let text = "Public Controlled Substance Disposal Locations: Bus NameMapAddr 1100 MAIN STCity, State ZipOKC, OK 73120";
        assert!(extract_labeled_segments(text).is_empty());
    }

    #[test]
    fn keyword_anchor_reads_window_around_pharmacy() {
        let text = "Results near you\nCVS PHARMACY\n456 OAK AVE\nTULSA, OK 74104\n1.5 miles\n";
        let sites = extract_keyword_anchored(text);
        assert_eq!(sites.len(), 1);
        let site = &sites[0];
        assert_eq!(site.name, "CVS PHARMACY");
        assert_eq!(site.address1, "456 OAK AVE");
        assert_eq!(site.address2, "");
        assert!(
            site.city_state_zip.ends_with("TULSA, OK 74104"),
            "unexpected city/state/zip: {:?}",
            site.city_state_zip
        );
        assert_eq!(site.distance, "1.5 miles");
        assert_eq!(site.map_url, "");
    }

    #[test]
    fn keyword_anchor_finds_each_pharmacy() {
        let text = "1 CVS PHARMACY 2 WALMART PHARMACY 3";
        let names: Vec<String> = extract_keyword_anchored(text)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["CVS PHARMACY", "WALMART PHARMACY"]);
    }

    #[test]
    fn keyword_anchor_requires_uppercase_prefix() {
        assert!(extract_keyword_anchored("Visit our pharmacy today").is_empty());
        assert!(extract_keyword_anchored("PHARMACY").is_empty());
    }

    #[test]
    fn window_counts_characters_not_bytes() {
        let text = format!("{}CVS PHARMACY{}", "€".repeat(150), "é".repeat(300));
        let at = text.find("CVS").unwrap();
        let window = surrounding_window(&text, at);

        let before = window.chars().take_while(|c| *c == '€').count();
        assert_eq!(before, 100);
        assert_eq!(window.chars().count(), 300);
        assert!(window[before * '€'.len_utf8()..].starts_with("CVS PHARMACY"));
    }

    #[test]
    fn window_is_clamped_to_text_edges() {
        let text = "xx CVS PHARMACY yy";
        let at = text.find("CVS").unwrap();
        assert_eq!(surrounding_window(text, at), text);
    }

    #[test]
    fn prose_before_first_entry_is_not_a_site() {
        let text = "Public Controlled Substance Disposal Locations: Showing 1 result near 73120 Bus NameXYZ PHARMACYAddr 1100 MAIN STCity, State ZipOKC, OK 73120Dist1.2 miles";
        let sites = extract_labeled_segments(text);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].name, "XYZ PHARMACY");
    }

    #[test]
    fn name_stops_at_distance_label() {
        let text = "Public Controlled Substance Disposal Locations: Bus NameWALGREENS #4410Dist0.8 miles";
        let sites = extract_labeled_segments(text);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].name, "WALGREENS #4410");
        assert_eq!(sites[0].address1, "");
        assert_eq!(sites[0].distance, "0.8 miles");
    }

    #[test]
    fn chunk_without_any_field_label_is_dropped() {
        let text = "Public Controlled Substance Disposal Locations: Bus NameJUST A NAME";
        assert!(extract_labeled_segments(text).is_empty());
    }
}
