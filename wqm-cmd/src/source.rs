//! Row sources: local files or spreadsheet exports fetched over HTTP.
//!
//! A location ending in `.json` holds an array of objects; anything else is
//! read as CSV with a header row.

use anyhow::Context;
use log::info;
use reqwest::Client;
use wqm_core::{labels::Labels, record::Record};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    pub fn detect(location: &str) -> SourceFormat {
        // Ignore any query string or fragment of a URL.
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or(location)
            .trim();
        if path.to_lowercase().ends_with(".json") {
            SourceFormat::Json
        } else {
            SourceFormat::Csv
        }
    }
}

pub fn is_remote(location: &str) -> bool {
    let lowered = location.trim().to_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

pub fn build_client() -> anyhow::Result<Client> {
    Ok(Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?)
}

/// Read the whole body behind a location. A single attempt, no retry.
pub async fn read_location(client: &Client, location: &str) -> anyhow::Result<String> {
    let location = location.trim();
    if !is_remote(location) {
        return tokio::fs::read_to_string(location)
            .await
            .with_context(|| format!("Failed to read {}", location));
    }
    info!("Fetching {}", location);
    let response = client
        .get(location)
        .send()
        .await
        .with_context(|| format!("Request failed for {}. Are you connected to the Internet?", location))?;
    if !response.status().is_success() {
        anyhow::bail!("Bad response status for {}: {}", location, response.status());
    }
    response
        .text()
        .await
        .with_context(|| format!("Failed to read response body for {}", location))
}

pub async fn load_records(client: &Client, location: &str) -> anyhow::Result<Vec<Record>> {
    let body = read_location(client, location).await?;
    let records = match SourceFormat::detect(location) {
        SourceFormat::Csv => Record::parse_csv(&body),
        SourceFormat::Json => Record::parse_json(&body),
    }
    .with_context(|| format!("Failed to parse {}", location))?;
    info!("Loaded {} records from {}", records.len(), location);
    Ok(records)
}

pub async fn load_labels(client: &Client, location: &str) -> anyhow::Result<Labels> {
    let body = read_location(client, location).await?;
    let labels = match SourceFormat::detect(location) {
        SourceFormat::Csv => Labels::parse_csv(&body),
        SourceFormat::Json => Labels::parse_json(&body),
    }
    .with_context(|| format!("Failed to parse labels {}", location))?;
    Ok(labels)
}
