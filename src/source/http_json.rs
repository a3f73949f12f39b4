//! Paginated JSON feed source
//!
//! This module handles sources backed by an HTTP search endpoint:
//! - Building the shared HTTP client
//! - Requesting result pages for a query (`?q=...&page=N`)
//! - Accumulating items across pages into a cumulative view
//! - Classifying transport and payload errors

use crate::config::{HttpConfig, SourceConfig};
use crate::model::RawItem;
use crate::source::extractor::to_raw_item;
use crate::source::traits::{FeedSource, FeedView};
use crate::{ConfigError, SourceError, SourceResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client shared by all JSON feed sources
///
/// # Arguments
///
/// * `config` - User agent and timeout settings
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Endpoint layout of one JSON feed
#[derive(Debug, Clone)]
pub struct HttpJsonSettings {
    pub endpoint: Url,
    pub query_param: String,
    pub page_param: String,
    pub first_page: u32,
    pub items_field: Option<String>,
    pub handle_field: Option<String>,
    pub advance_delay: Duration,
}

impl HttpJsonSettings {
    pub fn from_config(config: &SourceConfig) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            ConfigError::Validation(format!("Source '{}' has no endpoint", config.id))
        })?;
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

        Ok(Self {
            endpoint,
            query_param: config.query_param.clone(),
            page_param: config.page_param.clone(),
            first_page: config.first_page,
            items_field: config.items_field.clone(),
            handle_field: config.handle_field.clone(),
            advance_delay: Duration::from_millis(config.advance_delay_ms),
        })
    }

    /// Builds the URL of one result page for a query
    pub fn page_url(&self, query: &str, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(&self.query_param, query)
            .append_pair(&self.page_param, &page.to_string());
        url
    }
}

/// Feed source reading a paginated JSON search endpoint
pub struct HttpJsonSource {
    client: Client,
    settings: Arc<HttpJsonSettings>,
}

impl HttpJsonSource {
    pub fn new(client: Client, settings: HttpJsonSettings) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
        }
    }
}

#[async_trait]
impl FeedSource for HttpJsonSource {
    async fn open(&self, query: &str) -> SourceResult<Box<dyn FeedView>> {
        tracing::debug!(
            "Opening JSON feed {} for '{}'",
            self.settings.endpoint,
            query
        );
        Ok(Box::new(HttpJsonView {
            client: self.client.clone(),
            settings: Arc::clone(&self.settings),
            query: query.to_string(),
            items: Vec::new(),
            next_page: self.settings.first_page,
            exhausted: false,
        }))
    }
}

/// Cumulative view over the pages loaded so far
struct HttpJsonView {
    client: Client,
    settings: Arc<HttpJsonSettings>,
    query: String,
    items: Vec<RawItem>,
    next_page: u32,
    exhausted: bool,
}

impl HttpJsonView {
    fn loaded(&self) -> bool {
        self.next_page != self.settings.first_page
    }

    /// Loads the next page and appends its items
    async fn load_next_page(&mut self) -> SourceResult<()> {
        let url = self.settings.page_url(&self.query, self.next_page);
        let payloads = fetch_page(&self.client, &url, self.settings.items_field.as_deref()).await?;
        tracing::debug!("Page {} returned {} items", self.next_page, payloads.len());

        if payloads.is_empty() {
            self.exhausted = true;
        }

        for payload in payloads {
            let position = self.items.len();
            self.items.push(to_raw_item(
                payload,
                self.settings.handle_field.as_deref(),
                position,
            ));
        }

        self.next_page += 1;
        Ok(())
    }
}

#[async_trait]
impl FeedView for HttpJsonView {
    async fn snapshot(&mut self) -> SourceResult<Vec<RawItem>> {
        if !self.loaded() {
            self.load_next_page().await?;
        }
        Ok(self.items.clone())
    }

    async fn advance(&mut self) -> SourceResult<()> {
        if self.exhausted {
            tracing::trace!("Feed exhausted, advance is a no-op");
            return Ok(());
        }

        self.load_next_page().await?;

        if !self.settings.advance_delay.is_zero() {
            tokio::time::sleep(self.settings.advance_delay).await;
        }
        Ok(())
    }
}

/// Fetches one result page and returns its items
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - Fully built page URL
/// * `items_field` - Field holding the item array, if the body is an object
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    items_field: Option<&str>,
) -> SourceResult<Vec<Value>> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body: Value = response.json().await.map_err(|e| {
        if e.is_timeout() {
            SourceError::Timeout {
                url: url.to_string(),
            }
        } else {
            SourceError::Decode {
                origin: url.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    extract_items(body, items_field, url.as_str())
}

fn classify_error(url: &Url, error: reqwest::Error) -> SourceError {
    if error.is_timeout() {
        SourceError::Timeout {
            url: url.to_string(),
        }
    } else {
        SourceError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Pulls the item array out of a page body
pub(crate) fn extract_items(
    body: Value,
    items_field: Option<&str>,
    origin: &str,
) -> SourceResult<Vec<Value>> {
    let items = match items_field {
        Some(field) => match body {
            Value::Object(mut map) => map.remove(field).ok_or_else(|| SourceError::Decode {
                origin: origin.to_string(),
                message: format!("missing field '{}'", field),
            })?,
            _ => {
                return Err(SourceError::Decode {
                    origin: origin.to_string(),
                    message: format!("expected an object with field '{}'", field),
                })
            }
        },
        None => body,
    };

    match items {
        Value::Array(items) => Ok(items),
        _ => Err(SourceError::Decode {
            origin: origin.to_string(),
            message: "expected an array of items".to_string(),
        }),
    }
}
