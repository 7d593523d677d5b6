use anyhow::{Context, Result};

use sample_map_shared::models::Table;
use sample_map_shared::table::parse_table;

/// Turn a spreadsheet share link into its CSV export link. Links without an
/// `/edit?gid=` segment are returned unchanged.
pub fn csv_export_url(url: &str) -> String {
    url.replace("/edit?gid=", "/export?format=csv&gid=")
}

/// Blocking client with the request timeout turned off.
pub fn http_client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(None)
        .build()
        .context("Failed to build HTTP client")
}

/// Download the sheet behind `url` and parse it. Any failure ends the run.
pub fn fetch_table(client: &reqwest::blocking::Client, url: &str) -> Result<Table> {
    let export_url = csv_export_url(url);
    tracing::info!(url = %export_url, "Reading spreadsheet");

    let resp = client
        .get(&export_url)
        .send()
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("Failed to fetch {export_url}"))?;
    let body = resp
        .bytes()
        .with_context(|| format!("Failed to read response from {export_url}"))?;

    let table = parse_table(body.as_ref())
        .with_context(|| format!("Failed to parse CSV from {export_url}"))?;
    tracing::info!(rows = table.len(), columns = table.columns.len(), "Data loaded");
    Ok(table)
}
