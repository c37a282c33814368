//! HTTP implementation of the remote services.
//!
//! Endpoints are resolved against `Settings::base_url`:
//! - POST indexExists.cgi   -> any JSON, truthiness decides
//! - POST buildIndex.cgi    -> ignored, success status only
//! - GET  search.cgi?searchQuery=<q> -> {key: "url<suffix>"}
//! - GET  data.cgi          -> {"<int>": number}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::{debug, info};

use webindex_types::Settings;

use crate::decode::{decode_samples, decode_search_hits, is_truthy, parse_lenient};
use crate::error::ClientError;
use crate::service::{MetricsService, RawSamples, RemoteIndexService, SearchHits};

/// Client for the index and metrics CGI endpoints.
#[derive(Debug, Clone)]
pub struct HttpIndexClient {
    client: Client,
    index_exists_url: Url,
    build_index_url: Url,
    search_url: Url,
    samples_url: Url,
    build_timeout: Duration,
}

impl HttpIndexClient {
    /// Create a client from settings.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidEndpoint` if the base URL or a path does
    /// not form a valid URL.
    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|e| ClientError::InvalidEndpoint(format!("{}: {e}", settings.base_url)))?;
        let join = |path: &str| {
            base.join(path)
                .map_err(|e| ClientError::InvalidEndpoint(format!("{path}: {e}")))
        };

        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        info!("Using index service at {}", base);
        Ok(Self {
            client,
            index_exists_url: join(&settings.index_exists_path)?,
            build_index_url: join(&settings.build_index_path)?,
            search_url: join(&settings.search_path)?,
            samples_url: join(&settings.samples_path)?,
            build_timeout: settings.build_timeout(),
        })
    }

    /// Map a transport error, singling out timeouts.
    fn transport_error(err: reqwest::Error, url: &Url) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(url.to_string())
        } else if err.is_connect() {
            ClientError::Unavailable(format!("{url}: {err}"))
        } else {
            ClientError::Http(err)
        }
    }

    /// Reject non-2xx responses.
    fn check_status(response: Response, url: &Url) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }

    /// Read a JSON body; an unparseable body is a contract violation.
    async fn read_json(response: Response, url: &Url) -> Result<Value, ClientError> {
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(e, url))?;
        serde_json::from_str(&body)
            .map_err(|e| ClientError::Decode(format!("{url} returned invalid JSON: {e}")))
    }
}

#[async_trait]
impl RemoteIndexService for HttpIndexClient {
    async fn index_exists(&self) -> Result<bool, ClientError> {
        let url = &self.index_exists_url;
        debug!("POST {}", url);
        let response = self
            .client
            .post(url.clone())
            .send()
            .await
            .map_err(|e| Self::transport_error(e, url))?;
        let response = Self::check_status(response, url)?;
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(e, url))?;

        let exists = is_truthy(&parse_lenient(&body));
        debug!(exists, "Index existence checked");
        Ok(exists)
    }

    async fn build_index(&self) -> Result<(), ClientError> {
        let url = &self.build_index_url;
        info!("POST {} (timeout {:?})", url, self.build_timeout);
        let response = self
            .client
            .post(url.clone())
            .timeout(self.build_timeout)
            .send()
            .await
            .map_err(|e| Self::transport_error(e, url))?;
        Self::check_status(response, url)?;
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<SearchHits, ClientError> {
        let url = &self.search_url;
        debug!(query, "GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .query(&[("searchQuery", query)])
            .send()
            .await
            .map_err(|e| Self::transport_error(e, url))?;
        let response = Self::check_status(response, url)?;
        decode_search_hits(Self::read_json(response, url).await?)
    }
}

#[async_trait]
impl MetricsService for HttpIndexClient {
    async fn fetch_memory_samples(&self) -> Result<RawSamples, ClientError> {
        let url = &self.samples_url;
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Self::transport_error(e, url))?;
        let response = Self::check_status(response, url)?;
        decode_samples(Self::read_json(response, url).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_resolved_against_base() {
        let client = HttpIndexClient::from_settings(&Settings::default()).unwrap();
        assert_eq!(
            client.index_exists_url.as_str(),
            "http://localhost:8080/cgi-bin/indexExists.cgi"
        );
        assert_eq!(
            client.samples_url.as_str(),
            "http://localhost:8080/cgi-bin/data.cgi"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let settings = Settings {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        let err = HttpIndexClient::from_settings(&settings).unwrap_err();
        assert!(matches!(err, ClientError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_build_timeout_from_settings() {
        let settings = Settings {
            build_timeout_secs: 42,
            ..Default::default()
        };
        let client = HttpIndexClient::from_settings(&settings).unwrap();
        assert_eq!(client.build_timeout, Duration::from_secs(42));
    }
}
