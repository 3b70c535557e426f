//! Bearer API-key authentication.
//!
//! Each configured key maps to a [`Principal`]; the middleware resolves the
//! key once per request and stores the principal in the request extensions
//! for handlers to extract.

use std::collections::HashMap;
use std::fmt;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use bindery_core::domain::{AuthorizationScope, Principal};
use tracing::debug;

use super::app_state::AppState;
use super::config::ApiKeyConfig;
use super::errors::AppError;

#[derive(Clone, Default)]
pub struct ApiKeyTable {
    principals: HashMap<String, Principal>,
}

impl ApiKeyTable {
    pub fn from_config(entries: &[ApiKeyConfig]) -> Self {
        let principals = entries
            .iter()
            .map(|entry| {
                let scope = match &entry.libraries {
                    Some(ids) => AuthorizationScope::libraries(ids.iter().copied()),
                    None => AuthorizationScope::Unrestricted,
                };
                let principal = Principal {
                    user_id: entry.user_id,
                    is_admin: entry.admin,
                    scope,
                };
                (entry.key.clone(), principal)
            })
            .collect();
        Self { principals }
    }

    pub fn resolve(&self, key: &str) -> Option<&Principal> {
        self.principals.get(key)
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

impl fmt::Debug for ApiKeyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyTable")
            .field("keys", &self.principals.len())
            .finish()
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;

    let principal = state.api_keys.resolve(token).cloned().ok_or_else(|| {
        debug!("rejected unknown api key");
        AppError::unauthorized("Invalid API key")
    })?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Result<&str, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Authentication required"))
}
