//! Disposal-site lookup for a ZIP code and search radius.
//!
//! A [`ResultsPageSource`] produces the rendered results page (form entry
//! and navigation happen behind it); [`DisposalSiteLookup`] validates the
//! request, bounds the wait, and runs the extraction engine exactly once on
//! the page it gets back.

mod fetch;

use std::time::Duration;

use async_trait::async_trait;
use rxdrop_core::{AppConfig, SearchRadius, SiteRecord, ZipCode};
use serde::Serialize;
use url::Url;

use crate::document::{DocumentView, HtmlDocument};
use crate::error::LookupError;
use crate::extract::extract;

pub use fetch::HttpResultsSource;

/// Phrases the results page shows when nothing is near the requested ZIP.
pub const NO_RESULTS_MARKERS: [&str; 3] = ["No results", "no results", "No locations found"];

/// Produces the HTML of a results page for a search.
#[async_trait]
pub trait ResultsPageSource: Send + Sync {
    /// Load the results page for `zip` within `radius` miles.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] when the page cannot be obtained.
    async fn load_results(&self, zip: &ZipCode, radius: SearchRadius)
        -> Result<String, LookupError>;

    /// URL that relative links on the page loaded for `zip` and `radius`
    /// resolve against. `None` leaves them as written.
    fn base_url(&self, _zip: &ZipCode, _radius: SearchRadius) -> Option<Url> {
        None
    }
}

/// Response envelope for one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupReport {
    pub zip_code: ZipCode,
    pub radius: SearchRadius,
    pub count: usize,
    pub sites: Vec<SiteRecord>,
}

/// Runs disposal-site searches against a [`ResultsPageSource`].
pub struct DisposalSiteLookup<S> {
    source: S,
    timeout: Duration,
    default_radius: SearchRadius,
}

impl<S: ResultsPageSource> DisposalSiteLookup<S> {
    /// Creates a lookup that waits at most `timeout` for each results page.
    pub fn new(source: S, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            default_radius: SearchRadius::default(),
        }
    }

    /// Creates a lookup using the timeout and default radius from `config`.
    pub fn from_config(source: S, config: &AppConfig) -> Self {
        Self::new(source, Duration::from_secs(config.lookup_timeout_secs))
            .with_default_radius(config.default_radius)
    }

    /// Radius used when a request does not name one.
    #[must_use]
    pub fn with_default_radius(mut self, radius: SearchRadius) -> Self {
        self.default_radius = radius;
        self
    }

    /// Validates the request and returns the disposal sites for it.
    ///
    /// An empty list means the page reported no sites nearby.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Validation`] for a missing or malformed ZIP
    /// code or an unsupported radius, [`LookupError::Timeout`] when the page
    /// does not arrive in time, and any error raised by the page source
    /// unchanged.
    pub async fn get_disposal_sites(
        &self,
        zip_code: &str,
        radius: Option<&str>,
    ) -> Result<Vec<SiteRecord>, LookupError> {
        let (zip, radius) = self.validate(zip_code, radius)?;
        self.search(&zip, radius).await
    }

    /// Like [`Self::get_disposal_sites`], wrapped in a [`LookupReport`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_disposal_sites`].
    pub async fn lookup_report(
        &self,
        zip_code: &str,
        radius: Option<&str>,
    ) -> Result<LookupReport, LookupError> {
        let (zip, radius) = self.validate(zip_code, radius)?;
        let sites = self.search(&zip, radius).await?;
        Ok(LookupReport {
            zip_code: zip,
            radius,
            count: sites.len(),
            sites,
        })
    }

    /// Searches with an already-validated request.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Timeout`] when the page does not arrive in
    /// time, and any error raised by the page source unchanged.
    pub async fn search(
        &self,
        zip: &ZipCode,
        radius: SearchRadius,
    ) -> Result<Vec<SiteRecord>, LookupError> {
        tracing::info!(zip = %zip, radius = %radius, "looking up disposal sites");

        let html = tokio::time::timeout(self.timeout, self.source.load_results(zip, radius))
            .await
            .map_err(|_| {
                tracing::warn!(
                    zip = %zip,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "results page timed out"
                );
                LookupError::Timeout {
                    after_secs: self.timeout.as_secs(),
                }
            })??;

        let base_url = self.source.base_url(zip, radius);
        let sites = sites_from_page(&html, base_url);
        tracing::info!(zip = %zip, count = sites.len(), "disposal site lookup finished");
        Ok(sites)
    }

    fn validate(
        &self,
        zip_code: &str,
        radius: Option<&str>,
    ) -> Result<(ZipCode, SearchRadius), LookupError> {
        let zip = ZipCode::parse(zip_code)?;
        let radius = match radius {
            Some(raw) => raw.parse::<SearchRadius>()?,
            None => self.default_radius,
        };
        Ok((zip, radius))
    }
}

/// Parse `html` and extract its sites. The parsed document stays inside this
/// function; it is not `Send` and must not live across an `.await`.
fn sites_from_page(html: &str, base_url: Option<Url>) -> Vec<SiteRecord> {
    let document = match base_url {
        Some(base) => HtmlDocument::parse_with_base_url(html, base),
        None => HtmlDocument::parse(html),
    };

    let text = document.full_text();
    if NO_RESULTS_MARKERS.iter().any(|marker| text.contains(marker)) {
        tracing::info!("results page reports no locations");
        return Vec::new();
    }

    extract(&document)
}
