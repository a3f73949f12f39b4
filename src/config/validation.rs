use crate::config::types::{
    BudgetConfig, CollectionConfig, Config, HttpConfig, OutputConfig, ServerConfig, SourceConfig,
    SourceKind,
};
use crate::ConfigError;
use std::collections::HashSet;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_collection_config(&config.collection)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    validate_server_config(&config.server)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates collection loop limits
fn validate_collection_config(config: &CollectionConfig) -> Result<(), ConfigError> {
    if config.stall_threshold < 1 {
        return Err(ConfigError::Validation(format!(
            "stall_threshold must be >= 1, got {}",
            config.stall_threshold
        )));
    }

    validate_budget("targeted", &config.targeted)?;
    validate_budget("exhaustive", &config.exhaustive)?;
    Ok(())
}

fn validate_budget(name: &str, budget: &BudgetConfig) -> Result<(), ConfigError> {
    if budget.max_advances < 1 {
        return Err(ConfigError::Validation(format!(
            "{} max_advances must be >= 1, got {}",
            name, budget.max_advances
        )));
    }

    if budget.time_budget_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "{} time_budget_secs must be >= 1, got {}",
            name, budget.time_budget_secs
        )));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("Invalid bind address '{}': {}", config.bind, e))
    })?;
    Ok(())
}

/// Validates every source entry and the uniqueness of their ids
fn validate_sources(sources: &[SourceConfig]) -> Result<(), ConfigError> {
    let mut ids = HashSet::new();

    for source in sources {
        validate_source_id(&source.id)?;

        if !ids.insert(source.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate source id '{}'",
                source.id
            )));
        }

        validate_source(source)?;
    }

    Ok(())
}

/// Source ids end up in output file names, so only lower snake case is allowed
fn validate_source_id(id: &str) -> Result<(), ConfigError> {
    if id.is_empty() {
        return Err(ConfigError::Validation(
            "source id cannot be empty".to_string(),
        ));
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "source id must contain only lowercase letters, digits and underscores, got '{}'",
            id
        )));
    }

    Ok(())
}

fn validate_source(source: &SourceConfig) -> Result<(), ConfigError> {
    match source.kind {
        SourceKind::HttpJson => {
            let endpoint = source.endpoint.as_deref().ok_or_else(|| {
                ConfigError::Validation(format!(
                    "Source '{}' of kind http-json requires an endpoint",
                    source.id
                ))
            })?;

            let url = Url::parse(endpoint).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid endpoint '{}': {}", endpoint, e))
            })?;

            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::Validation(format!(
                    "Endpoint '{}' must use http or https",
                    endpoint
                )));
            }

            if source.query_param.is_empty() || source.page_param.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Source '{}' needs non-empty query-param and page-param",
                    source.id
                )));
            }
        }
        SourceKind::File => {
            if source.path.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::Validation(format!(
                    "Source '{}' of kind file requires a path",
                    source.id
                )));
            }
        }
    }

    if source.columns.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Source '{}' must declare at least one column",
            source.id
        )));
    }

    let mut seen = HashSet::new();
    for column in &source.columns {
        if column.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Source '{}' has an empty column name",
                source.id
            )));
        }
        if !seen.insert(column.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Source '{}' declares column '{}' twice",
                source.id, column
            )));
        }
    }

    if source.key_fields.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Source '{}' must declare at least one key field",
            source.id
        )));
    }

    for field in &source.key_fields {
        if !seen.contains(field.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Key field '{}' of source '{}' is not one of its columns",
                field, source.id
            )));
        }
    }

    Ok(())
}
