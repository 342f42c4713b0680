//! Read-only endpoints backing the admin page: nonce issue and form listing.

use axum::extract::State;
use serde::Serialize;
use tracing::instrument;

use super::{AJAX_PATH, auth::CurrentAdmin, error::AjaxError, response::AjaxResponse, state::AppState};
use crate::core::forms::{FormSummary, list_forms};

/// Values the admin page needs to call the AJAX handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminScriptData {
    /// Nonce for the profile's nonce action
    pub nonce: String,
    /// Path of the AJAX endpoint
    pub ajax_url: &'static str,
    /// Action the nonce is bound to
    pub action: &'static str,
    /// Action name of the generate handler
    pub generate_action: &'static str,
    /// Action name of the update handler
    pub update_action: &'static str,
}

/// `GET /api/nonce`
#[instrument(skip_all, fields(admin = %admin.login))]
pub async fn issue_nonce(
    State(state): State<AppState>,
    admin: CurrentAdmin,
) -> Result<AjaxResponse<AdminScriptData>, AjaxError> {
    admin.require_capability(&state)?;
    let profile = state.profile();

    Ok(AjaxResponse::success(AdminScriptData {
        nonce: state.nonce_key().create(profile.nonce_action(), &admin.login),
        ajax_url: AJAX_PATH,
        action: profile.nonce_action(),
        generate_action: profile.generate_action(),
        update_action: profile.update_action(),
    }))
}

/// `GET /api/forms`
#[instrument(skip_all, fields(admin = %admin.login))]
pub async fn forms(
    State(state): State<AppState>,
    admin: CurrentAdmin,
) -> Result<AjaxResponse<Vec<FormSummary>>, AjaxError> {
    admin.require_capability(&state)?;
    let forms = list_forms(state.db()).await?;
    Ok(AjaxResponse::success(forms))
}
