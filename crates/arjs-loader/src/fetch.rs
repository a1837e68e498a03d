// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Transport capability used to retrieve module sources

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::LoaderConfig;
use crate::error::FetchError;

/// A fetched resource.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Status code (200 for local files)
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Whether the transport followed a redirect
    pub redirected: bool,
    /// Final URL after redirects
    pub url: String,
    /// Raw body
    pub body: Bytes,
}

impl FetchResponse {
    /// A successful response with no headers, as served from `url`.
    pub fn ok(url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            headers: HeaderMap::new(),
            redirected: false,
            url: url.into(),
            body: body.into(),
        }
    }

    /// The `content-type` header, if present and readable
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }
}

/// Retrieves the resource at a location.
///
/// Implementations report transport failures as errors; HTTP error statuses
/// are ordinary responses and are classified by the loader.
#[async_trait]
pub trait Fetch: Send + Sync + 'static {
    /// Fetch `url`
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        (**self).fetch(url).await
    }
}

/// Fetcher backed by `reqwest` for `http(s)://` and the local disk for `file://`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::from_config(&LoaderConfig::default())
    }

    /// Create a fetcher using the timeout and user agent of `config`
    pub fn from_config(config: &LoaderConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());

        if let Some(secs) = config.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn fetch_http(&self, requested: Url) -> Result<FetchResponse, FetchError> {
        let response = self.client.get(requested.clone()).send().await?;

        let status = response.status().as_u16();
        let redirected = response.url() != &requested;
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!(status, redirected, %url, bytes = body.len(), "Fetched");

        Ok(FetchResponse {
            status,
            headers,
            redirected,
            url,
            body,
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let requested =
            Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

        match requested.scheme() {
            "http" | "https" => self.fetch_http(requested).await,
            "file" => fetch_file(requested).await,
            _ => Err(FetchError::UnsupportedScheme(url.to_string())),
        }
    }
}

async fn fetch_file(requested: Url) -> Result<FetchResponse, FetchError> {
    let path = requested
        .to_file_path()
        .map_err(|_| FetchError::InvalidUrl(requested.to_string()))?;

    let body = tokio::fs::read(&path).await?;
    debug!(path = %path.display(), bytes = body.len(), "Read local module");

    Ok(FetchResponse::ok(requested.to_string(), body))
}
