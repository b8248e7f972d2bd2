// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use globalview_app::CountryRecord;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://restcountries.com/v3.1/all";

/// Anything that can produce the full country list in one call.
pub trait DataSource {
    fn fetch_countries(&self) -> Result<Vec<CountryRecord>, FetchError>;
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot reach {endpoint} ({source})")]
    Connect {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}{}", body_suffix(.body))]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("read response from {endpoint}")]
    Read {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("decode country list from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let trimmed = endpoint.trim();
        if trimmed.is_empty() {
            bail!("source.endpoint must not be empty");
        }
        let endpoint = Url::parse(trimmed)
            .with_context(|| format!("source.endpoint {trimmed:?} is not a valid URL"))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            bail!(
                "source.endpoint {trimmed:?} must use http or https, got {:?}",
                endpoint.scheme()
            );
        }
        if timeout.is_zero() {
            bail!("source.timeout must be positive");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            endpoint,
            timeout,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl DataSource for Client {
    fn fetch_countries(&self) -> Result<Vec<CountryRecord>, FetchError> {
        let endpoint = self.endpoint.as_str().to_owned();
        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .map_err(|source| FetchError::Connect {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().map_err(|source| FetchError::Read {
            endpoint: endpoint.clone(),
            source,
        })?;
        let countries = decode_countries(&body).map_err(|source| FetchError::Decode {
            endpoint: endpoint.clone(),
            source,
        })?;
        tracing::debug!(%endpoint, count = countries.len(), "fetched countries");
        Ok(countries)
    }
}

/// Decodes the countries payload: a JSON array of objects carrying
/// `name.common`, `region` and `population`. Other fields are ignored.
pub fn decode_countries(body: &str) -> Result<Vec<CountryRecord>, serde_json::Error> {
    let wire: Vec<WireCountry> = serde_json::from_str(body)?;
    Ok(wire.into_iter().map(CountryRecord::from).collect())
}

#[derive(Debug, Deserialize)]
struct WireCountry {
    name: WireName,
    #[serde(default)]
    region: Option<String>,
    population: u64,
}

#[derive(Debug, Deserialize)]
struct WireName {
    common: String,
}

impl From<WireCountry> for CountryRecord {
    fn from(wire: WireCountry) -> Self {
        Self {
            name: wire.name.common,
            region: wire.region.unwrap_or_default(),
            population: wire.population,
        }
    }
}

fn body_suffix(body: &str) -> String {
    let body = body.trim();
    if !body.is_empty() && body.len() < 100 && !body.contains('{') {
        return format!(": {body}");
    }
    String::new()
}
