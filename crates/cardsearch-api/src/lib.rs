// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use cardsearch_app::{
    Query, Record, SearchError, SearchOutcome, decode_records, filter_records,
};
use reqwest::blocking::Client as HttpClient;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://localhost:7345/api/D_Genbco_T/Retrieve";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientOptions {
    /// `None` leaves reqwest's own default in place.
    pub timeout: Option<Duration>,
    /// The development API serves a self-signed certificate.
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Url,
    http: HttpClient,
}

impl Client {
    pub fn new(endpoint: &str, options: ClientOptions) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            bail!("search.endpoint must not be empty");
        }
        let endpoint =
            Url::parse(endpoint).with_context(|| format!("parse endpoint {endpoint:?}"))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            bail!(
                "endpoint {} must use http or https, got {:?}",
                endpoint,
                endpoint.scheme()
            );
        }

        let mut builder = HttpClient::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if options.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build().context("build HTTP client")?;

        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Downloads the full catalog with a single GET. The query never reaches
    /// the server.
    pub fn fetch_records(&self) -> Result<Vec<Record>, SearchError> {
        let started = Instant::now();
        debug!(endpoint = %self.endpoint, "fetching catalog");

        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .map_err(|error| {
                warn!(endpoint = %self.endpoint, %error, "request failed");
                SearchError::Connection {
                    endpoint: endpoint_label(&self.endpoint),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "non-success status");
            return Err(SearchError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }

        let body = response
            .text()
            .map_err(|error| SearchError::unexpected(format!("read response body: {error}")))?;
        let records = decode_records(&body)?;
        debug!(
            count = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog fetched"
        );
        Ok(records)
    }

    pub fn search(&self, query: &Query) -> SearchOutcome {
        match self.fetch_records() {
            Ok(records) => SearchOutcome::Matches(filter_records(records, query)),
            Err(error) => SearchOutcome::Failed(error),
        }
    }
}

/// `host:port` of the endpoint, as shown to the user when it is unreachable.
fn endpoint_label(endpoint: &Url) -> String {
    let host = endpoint.host_str().unwrap_or("?");
    match endpoint.port_or_known_default() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    }
}
