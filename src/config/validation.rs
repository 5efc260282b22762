//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check the provider cascade is usable (non-empty, unique names)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.base_url '{0}' is not a valid http(s) URL")]
    InvalidBaseUrl(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("{field} '{path}' must start with '/'")]
    RelativePath { field: String, path: String },

    #[error("at least one provider must be configured")]
    NoProviders,

    #[error("provider '{0}' is declared more than once")]
    DuplicateProvider(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.backend.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => errors.push(ValidationError::InvalidBaseUrl(config.backend.base_url.clone())),
    }

    if config.backend.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("backend.request_timeout_ms"));
    }
    if config.health.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("health.timeout_ms"));
    }
    if config.fallback.cooldown_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("fallback.cooldown_ms"));
    }

    check_path(&mut errors, "health.primary_path", &config.health.primary_path);
    check_path(&mut errors, "health.alternate_path", &config.health.alternate_path);

    if config.providers.is_empty() {
        errors.push(ValidationError::NoProviders);
    }

    let mut seen = HashSet::new();
    for provider in &config.providers {
        if !seen.insert(provider.name.as_str()) {
            errors.push(ValidationError::DuplicateProvider(provider.name.clone()));
        }
        if provider.timeout_ms == 0 {
            errors.push(ValidationError::ZeroTimeout("providers.timeout_ms"));
        }
        check_path(&mut errors, &format!("providers.{}.path", provider.name), &provider.path);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_path(errors: &mut Vec<ValidationError>, field: &str, path: &str) {
    if !path.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field: field.to_string(),
            path: path.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ProviderConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_duplicate_and_missing_providers() {
        let mut config = GatewayConfig::default();
        config.providers.push(ProviderConfig {
            name: "deepseek".into(),
            path: "api/resume/analyze".into(),
            timeout_ms: 1000,
            use_fallback_provider: false,
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateProvider("deepseek".into())));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::RelativePath { .. })));

        config.providers.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoProviders]);
    }
}
