//! `rxdrop lookup`: fetch a live results page and extract it.

use rxdrop_core::AppConfig;
use rxdrop_scraper::{DisposalSiteLookup, HttpResultsSource};

/// Look up disposal sites for `zip` and print the [`rxdrop_scraper::LookupReport`].
///
/// # Errors
///
/// Returns an error when `RXDROP_RESULTS_URL` is unset or invalid, or when
/// the lookup fails. Lookup failures are labelled with their
/// [`rxdrop_scraper::FailureKind`].
pub(crate) async fn run_lookup(
    config: &AppConfig,
    zip: &str,
    radius: Option<&str>,
) -> anyhow::Result<()> {
    tracing::debug!(
        env = %config.env,
        timeout_secs = config.lookup_timeout_secs,
        default_radius = %config.default_radius,
        "loaded lookup configuration"
    );
    let source = HttpResultsSource::from_config(config)?;
    let lookup = DisposalSiteLookup::from_config(source, config);

    let report = lookup
        .lookup_report(zip, radius)
        .await
        .map_err(|err| anyhow::anyhow!("lookup failed ({}): {err}", err.kind()))?;

    if report.sites.is_empty() {
        tracing::warn!(zip = %report.zip_code, radius = %report.radius, "no disposal sites found");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
