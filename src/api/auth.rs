//! Bearer-token authentication and the nonce/capability checks run before any
//! admin action.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{error::AjaxError, state::AppState};

/// The authenticated administrator of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentAdmin {
    /// Login name, bound into nonces
    pub login: String,
    /// Capabilities granted by configuration
    pub capabilities: Vec<String>,
}

impl CurrentAdmin {
    /// Whether this admin holds `capability`.
    #[must_use]
    pub fn can(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }

    /// Fails unless this admin holds the capability the profile requires.
    pub fn require_capability(&self, state: &AppState) -> Result<(), AjaxError> {
        if self.can(state.profile().required_capability()) {
            Ok(())
        } else {
            Err(AjaxError::PermissionDenied)
        }
    }

    /// Verifies the request nonce, then the capability.
    pub fn authorize(&self, state: &AppState, nonce: Option<&str>) -> Result<(), AjaxError> {
        let action = state.profile().nonce_action();
        let valid = nonce.is_some_and(|n| state.nonce_key().verify(n, action, &self.login));
        if !valid {
            return Err(AjaxError::InvalidNonce);
        }
        self.require_capability(state)
    }
}

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AjaxError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AjaxError::Unauthenticated)?;

        let admin = state
            .admin_by_token(token)
            .ok_or(AjaxError::Unauthenticated)?;

        Ok(Self {
            login: admin.login.clone(),
            capabilities: admin.capabilities.clone(),
        })
    }
}
