use std::collections::HashSet;

use thiserror::Error;

use super::models::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(&mut self, message: S, hint: H) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("server.port must be non-zero")]
    ZeroPort,
    #[error("database.max_connections must be at least 1")]
    ZeroConnections,
    #[error("pagination.max_page_size must be at least 1")]
    ZeroMaxPageSize,
    #[error("api key for user {user_id} is empty")]
    EmptyApiKey { user_id: String },
    #[error("api key for user {user_id} is configured more than once")]
    DuplicateApiKey { user_id: String },
}

/// Rejects configurations that cannot serve requests and collects warnings
/// for ones that can but probably should not.
pub fn apply_guard_rails(config: &mut Config) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.server.port == 0 {
        return Err(ConfigGuardRailError::ZeroPort);
    }
    if config.database.max_connections == 0 {
        return Err(ConfigGuardRailError::ZeroConnections);
    }
    if config.pagination.max_page_size == 0 {
        return Err(ConfigGuardRailError::ZeroMaxPageSize);
    }

    let pagination = &mut config.pagination;
    if pagination.default_page_size == 0 || pagination.default_page_size > pagination.max_page_size
    {
        let clamped = pagination.default_page_size.clamp(1, pagination.max_page_size);
        warnings.push(format!(
            "pagination.default_page_size {} is outside 1..={}; using {clamped}",
            pagination.default_page_size, pagination.max_page_size
        ));
        pagination.default_page_size = clamped;
    }

    let mut seen = HashSet::with_capacity(config.api_keys.len());
    for entry in &config.api_keys {
        if entry.key.trim().is_empty() {
            return Err(ConfigGuardRailError::EmptyApiKey {
                user_id: entry.user_id.to_string(),
            });
        }
        if !seen.insert(entry.key.as_str()) {
            return Err(ConfigGuardRailError::DuplicateApiKey {
                user_id: entry.user_id.to_string(),
            });
        }
        if entry.admin && entry.libraries.is_some() {
            warnings.push(format!(
                "admin key for user {} is limited to specific libraries",
                entry.user_id
            ));
        }
    }

    if config.api_keys.is_empty() {
        warnings.push_with_hint(
            "No API keys configured; every /api/v1 request will be rejected",
            "Add [[api_keys]] entries to bindery.toml or set BINDERY_ADMIN_KEY",
        );
    }

    if !config.uses_postgres() {
        warnings.push_with_hint(
            "DATABASE_URL not set; read lists are kept in memory and lost on restart",
            "Set DATABASE_URL or database.url to persist to PostgreSQL",
        );
    }

    Ok(warnings)
}
