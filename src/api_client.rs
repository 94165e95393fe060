use std::fmt::Display;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::{Proxy, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::config::ClientConfig;
use crate::error::LookupError;
use crate::models::BinRecord;

pub const API_BASE: &str = "https://lookup.binlist.net/";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking client for the binlist.net lookup service.
///
/// Holds no per-lookup state, so a shared reference can be used from
/// several threads.
#[derive(Clone, Debug)]
pub struct BinLookupClient {
    base_url: Url,
    proxy: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
    client: Client,
}

#[derive(Debug, Clone)]
pub struct BinLookupClientBuilder {
    base_url: String,
    proxy: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
}

impl Default for BinLookupClientBuilder {
    fn default() -> Self {
        Self {
            base_url: API_BASE.to_string(),
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl BinLookupClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Default proxy for every lookup; a per-call proxy takes precedence
    pub fn proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn build(self) -> Result<BinLookupClient, LookupError> {
        let base_url = Url::parse(&self.base_url).map_err(|_| LookupError::InvalidBaseUrl {
            url: self.base_url.clone(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(LookupError::InvalidBaseUrl { url: self.base_url });
        }

        let client = build_http_client(self.proxy.as_deref(), self.timeout, self.connect_timeout)?;

        Ok(BinLookupClient {
            base_url,
            proxy: self.proxy,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            client,
        })
    }
}

fn build_http_client(
    proxy: Option<&str>,
    timeout: Duration,
    connect_timeout: Duration,
) -> Result<Client, LookupError> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .connect_timeout(connect_timeout);

    if let Some(proxy_url) = proxy {
        // Same proxy for http and https
        let proxy = Proxy::all(proxy_url).map_err(|source| LookupError::InvalidProxy {
            proxy: proxy_url.to_string(),
            source,
        })?;
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

impl BinLookupClient {
    pub fn new() -> Result<Self, LookupError> {
        Self::builder().build()
    }

    pub fn builder() -> BinLookupClientBuilder {
        BinLookupClientBuilder::default()
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, LookupError> {
        Self::builder()
            .base_url(config.base_url.clone())
            .proxy(config.proxy.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Look up a BIN and map the response into a [`BinRecord`].
    ///
    /// The BIN is not validated; the service rejects malformed values.
    pub fn fetch(&self, bin: impl Display, proxy: Option<&str>) -> Result<BinRecord, LookupError> {
        let bin = bin.to_string();
        let value = self.get_json(&bin, proxy)?;
        let record = BinRecord::from_json(value)?;

        info!(
            target: "api_client",
            "BIN {} resolved: scheme={:?} bank={:?}",
            bin, record.scheme, record.bank.name
        );
        Ok(record)
    }

    /// Look up a BIN and return the decoded JSON body untouched
    pub fn fetch_raw(&self, bin: impl Display, proxy: Option<&str>) -> Result<Value, LookupError> {
        let bin = bin.to_string();
        self.get_json(&bin, proxy)
    }

    /// `{base_url}/{bin}` with the BIN appended as one path segment
    pub fn lookup_url(&self, bin: &str) -> Result<Url, LookupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .push(bin);
        Ok(url)
    }

    fn get_json(&self, bin: &str, proxy: Option<&str>) -> Result<Value, LookupError> {
        let response = self.send(bin, proxy)?;
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn send(&self, bin: &str, proxy: Option<&str>) -> Result<Response, LookupError> {
        let url = self.lookup_url(bin)?;
        debug!(target: "api_client", "GET {} (proxy: {:?})", url, proxy.or(self.proxy.as_deref()));

        let response = match proxy {
            Some(proxy) => build_http_client(Some(proxy), self.timeout, self.connect_timeout)?
                .get(url)
                .send()?,
            None => self.client.get(url).send()?,
        };

        let status = response.status();
        match status {
            StatusCode::OK => Ok(response),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!(target: "api_client", "Rate limited while looking up BIN {}", bin);
                Err(LookupError::RateLimitExceeded {
                    status_code: status.as_u16(),
                })
            }
            _ => {
                warn!(target: "api_client", "Lookup for BIN {} failed with {}", bin, status);
                Err(LookupError::LookupFailed {
                    bin: bin.to_string(),
                    status_code: status.as_u16(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let client = BinLookupClient::new().unwrap();
        assert_eq!(client.base_url().as_str(), API_BASE);
        assert_eq!(
            client.lookup_url("45717360").unwrap().as_str(),
            "https://lookup.binlist.net/45717360"
        );
    }

    #[test]
    fn test_lookup_url_without_trailing_slash() {
        let client = BinLookupClient::builder()
            .base_url("http://localhost:8080/api")
            .build()
            .unwrap();
        assert_eq!(
            client.lookup_url("4571").unwrap().as_str(),
            "http://localhost:8080/api/4571"
        );
    }

    #[test]
    fn test_lookup_url_keeps_bin_in_one_segment() {
        let client = BinLookupClient::new().unwrap();
        let url = client.lookup_url("45/../x?y").unwrap();
        assert_eq!(url.path(), "/45%2F..%2Fx%3Fy");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_rejects_non_base_url() {
        let err = BinLookupClient::builder()
            .base_url("mailto:someone@example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, LookupError::InvalidBaseUrl { .. }));

        let err = BinLookupClient::builder()
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, LookupError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_rejects_invalid_proxy() {
        let err = BinLookupClient::builder()
            .proxy(Some("http://[::1".to_string()))
            .build()
            .unwrap_err();
        assert!(matches!(err, LookupError::InvalidProxy { .. }));
    }
}
