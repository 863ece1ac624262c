//! Results pages fetched over HTTP from a rendering service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rxdrop_core::{AppConfig, SearchRadius, ZipCode};
use url::Url;

use super::ResultsPageSource;
use crate::error::LookupError;

const ZIP_PLACEHOLDER: &str = "{zip}";
const RADIUS_PLACEHOLDER: &str = "{radius}";

/// Loads a results page by GETting a URL template such as
/// `https://render.local/disposal?zip={zip}&radius={radius}`.
pub struct HttpResultsSource {
    client: Client,
    url_template: String,
    page_base_url: Option<Url>,
    timeout_secs: u64,
}

impl HttpResultsSource {
    /// Creates a source with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidResultsUrl`] if `url_template` is not an
    /// absolute URL, or [`LookupError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(url_template: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, LookupError> {
        Url::parse(url_template).map_err(|err| LookupError::InvalidResultsUrl {
            url: url_template.to_string(),
            reason: err.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            url_template: url_template.to_string(),
            page_base_url: None,
            timeout_secs,
        })
    }

    /// Resolve relative links on fetched pages against `base` instead of
    /// the request URL. Use this when the renderer serves pages captured
    /// from another origin.
    #[must_use]
    pub fn with_page_base_url(mut self, base: Url) -> Self {
        self.page_base_url = Some(base);
        self
    }

    /// Creates a source from `RXDROP_RESULTS_URL`, the optional
    /// `RXDROP_PAGE_BASE_URL` and the HTTP settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidResultsUrl`] when no results URL is
    /// configured or the page base URL does not parse, plus anything
    /// [`Self::new`] returns.
    pub fn from_config(config: &AppConfig) -> Result<Self, LookupError> {
        let template = config
            .results_url
            .as_deref()
            .ok_or_else(|| LookupError::InvalidResultsUrl {
                url: String::new(),
                reason: "RXDROP_RESULTS_URL is not set".to_string(),
            })?;
        let source = Self::new(template, config.lookup_timeout_secs, &config.user_agent)?;

        match config.page_base_url.as_deref() {
            Some(raw) => {
                let base = Url::parse(raw).map_err(|err| LookupError::InvalidResultsUrl {
                    url: raw.to_string(),
                    reason: format!("RXDROP_PAGE_BASE_URL: {err}"),
                })?;
                Ok(source.with_page_base_url(base))
            }
            None => Ok(source),
        }
    }

    /// The concrete URL requested for `zip` and `radius`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidResultsUrl`] if substitution produces an
    /// unparseable URL.
    pub fn results_url(&self, zip: &ZipCode, radius: SearchRadius) -> Result<Url, LookupError> {
        let rendered = self
            .url_template
            .replace(ZIP_PLACEHOLDER, zip.as_str())
            .replace(RADIUS_PLACEHOLDER, radius.as_str());
        Url::parse(&rendered).map_err(|err| LookupError::InvalidResultsUrl {
            url: rendered,
            reason: err.to_string(),
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> LookupError {
        if err.is_timeout() {
            LookupError::Timeout {
                after_secs: self.timeout_secs,
            }
        } else {
            LookupError::Http(err)
        }
    }
}

#[async_trait]
impl ResultsPageSource for HttpResultsSource {
    async fn load_results(
        &self,
        zip: &ZipCode,
        radius: SearchRadius,
    ) -> Result<String, LookupError> {
        let url = self.results_url(zip, radius)?;
        tracing::debug!(url = %url, "fetching results page");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "results page request failed");
            return Err(LookupError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|err| self.transport_error(err))
    }

    fn base_url(&self, zip: &ZipCode, radius: SearchRadius) -> Option<Url> {
        self.page_base_url
            .clone()
            .or_else(|| self.results_url(zip, radius).ok())
    }
}
