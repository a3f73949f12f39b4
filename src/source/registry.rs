//! Source registry - resolves source identifiers to plugins at request time

use crate::collect::StopPolicy;
use crate::config::{Config, SourceConfig, SourceKind};
use crate::output::{CsvSink, ResultSink};
use crate::source::extractor::FieldExtractor;
use crate::source::file_feed::FileFeedSource;
use crate::source::http_json::{build_http_client, HttpJsonSettings, HttpJsonSource};
use crate::source::plugin::FeedPlugin;
use crate::source::traits::{FeedSource, SourcePlugin};
use crate::{ConfigError, HarvestError};
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Listing entry for one available source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub id: String,
    pub description: String,
}

/// Lookup table of registered source plugins
#[derive(Default)]
pub struct SourceRegistry {
    plugins: BTreeMap<String, Arc<dyn SourcePlugin>>,
    unavailable: BTreeMap<String, String>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every configured source
    ///
    /// All network sources share one HTTP client; all sources write CSV.
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.http).map_err(|e| {
            ConfigError::Validation(format!("Failed to build HTTP client: {}", e))
        })?;
        let policy = StopPolicy::from_config(&config.collection);
        let sink: Arc<dyn ResultSink> = Arc::new(CsvSink::new());

        let mut registry = Self::new();
        for source in &config.sources {
            let plugin = build_plugin(source, &client, &policy, Arc::clone(&sink))?;
            registry.register(&source.id, Arc::new(plugin));
        }

        tracing::info!(
            "Registered {} sources ({} unavailable)",
            registry.plugins.len(),
            registry.unavailable.len()
        );
        Ok(registry)
    }

    /// Registers a plugin under `id`
    ///
    /// A plugin without a description is recorded as unavailable and never
    /// dispatched to.
    pub fn register(&mut self, id: &str, plugin: Arc<dyn SourcePlugin>) {
        if plugin.description().trim().is_empty() {
            tracing::warn!("Plugin {} has no description, marking unavailable", id);
            self.plugins.remove(id);
            self.unavailable
                .insert(id.to_string(), "missing description".to_string());
            return;
        }

        tracing::debug!("Registered plugin {}", id);
        self.unavailable.remove(id);
        self.plugins.insert(id.to_string(), plugin);
    }

    /// Resolves `id` to a runnable plugin
    pub fn get(&self, id: &str) -> Result<Arc<dyn SourcePlugin>, HarvestError> {
        if let Some(plugin) = self.plugins.get(id) {
            return Ok(Arc::clone(plugin));
        }

        match self.unavailable.get(id) {
            Some(reason) => Err(HarvestError::Unavailable {
                id: id.to_string(),
                reason: reason.clone(),
            }),
            None => Err(HarvestError::UnknownSource(id.to_string())),
        }
    }

    /// Available sources, sorted by id
    pub fn list(&self) -> Vec<SourceInfo> {
        self.plugins
            .iter()
            .map(|(id, plugin)| SourceInfo {
                id: id.clone(),
                description: plugin.description().to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

fn build_plugin(
    config: &SourceConfig,
    client: &Client,
    policy: &StopPolicy,
    sink: Arc<dyn ResultSink>,
) -> Result<FeedPlugin, HarvestError> {
    let source: Box<dyn FeedSource> = match config.kind {
        SourceKind::HttpJson => {
            let settings = HttpJsonSettings::from_config(config)?;
            Box::new(HttpJsonSource::new(client.clone(), settings))
        }
        SourceKind::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                ConfigError::Validation(format!("Source '{}' has no path", config.id))
            })?;
            Box::new(FileFeedSource::new(path, config.handle_field.clone()))
        }
    };

    Ok(FeedPlugin::new(
        config.id.clone(),
        config.description.clone(),
        source,
        FieldExtractor::new(config.columns.clone()),
        config.key_fields.clone(),
        policy.clone(),
        sink,
    ))
}
