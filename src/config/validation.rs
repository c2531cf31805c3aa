//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Catch-all verbs must be valid, non-duplicated HTTP method tokens
//! - Discovery scope must be a well-formed module path
//! - Log level must be a known level
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DispatchConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::DispatchConfig;
use crate::routing::parse_verb;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("routing.catch_all_verbs must not be empty")]
    NoCatchAllVerbs,

    #[error("routing.catch_all_verbs contains invalid verb '{0}'")]
    InvalidVerb(String),

    #[error("routing.catch_all_verbs lists '{0}' more than once")]
    DuplicateVerb(String),

    #[error("discovery.scope '{0}' is not a module path")]
    InvalidScope(String),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DispatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routing.catch_all_verbs.is_empty() {
        errors.push(ValidationError::NoCatchAllVerbs);
    }
    let mut seen = HashSet::new();
    for verb in &config.routing.catch_all_verbs {
        match parse_verb(verb) {
            None => errors.push(ValidationError::InvalidVerb(verb.clone())),
            Some(method) => {
                if !seen.insert(method.clone()) {
                    errors.push(ValidationError::DuplicateVerb(method.to_string()));
                }
            }
        }
    }

    if let Some(scope) = &config.discovery.scope {
        if !is_module_path(scope) {
            errors.push(ValidationError::InvalidScope(scope.clone()));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A scope is one or more identifiers joined by `::` or `.`.
fn is_module_path(scope: &str) -> bool {
    let scope = scope.trim();
    !scope.is_empty()
        && scope.replace("::", ".").split('.').all(|ident| {
            !ident.is_empty()
                && ident.chars().all(|c| c.is_alphanumeric() || c == '_')
                && !ident.starts_with(|c: char| c.is_ascii_digit())
        })
}
