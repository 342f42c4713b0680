//! `admin-ajax.php` dispatch and the generate/update handlers.
//!
//! The `action` field picks the handler. Both handlers verify the nonce and
//! the profile's capability before reading any other field.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

use super::{
    auth::CurrentAdmin, error::AjaxError, params::AjaxParams, response::AjaxResponse,
    state::AppState,
};
use crate::core::{
    code::DEFAULT_CODE_LENGTH,
    csv_codes::extract_coupon_codes,
    generate::{GenerateRequest, MAX_QUANTITY, generate_coupons},
    meta::AmountType,
    update::{UpdateAction, UpdateKind, update_coupons},
};

/// Shortest random suffix a request may ask for.
pub const MIN_CODE_LENGTH: usize = 4;
/// Longest random suffix a request may ask for.
pub const MAX_CODE_LENGTH: usize = 32;

/// Entry point for every admin AJAX action.
#[instrument(skip_all, fields(admin = %admin.login))]
pub async fn admin_ajax(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, AjaxError> {
    let params = AjaxParams::from(fields);
    let action = params.text("action").unwrap_or_default();
    let profile = state.profile();

    if action == profile.generate_action() {
        admin.authorize(&state, params.text("nonce").as_deref())?;
        generate(&state, &params).await
    } else if action == profile.update_action() {
        admin.authorize(&state, params.text("nonce").as_deref())?;
        update(&state, &params).await
    } else {
        Err(AjaxError::bad_request("Unknown action"))
    }
}

/// Reads generation fields, applying the form's defaults.
fn generate_request(params: &AjaxParams) -> Result<GenerateRequest, AjaxError> {
    let form_id = params.int_or("form_id", 0);
    if form_id == 0 {
        return Err(AjaxError::bad_request("Form ID is required"));
    }

    let quantity = u32::try_from(params.int_or("quantity", 1))
        .ok()
        .filter(|q| (1..=MAX_QUANTITY).contains(q))
        .ok_or_else(|| {
            AjaxError::bad_request(format!("Quantity must be between 1 and {MAX_QUANTITY}"))
        })?;

    let default_length = i64::try_from(DEFAULT_CODE_LENGTH).unwrap_or(8);
    let code_length = usize::try_from(params.int_or("coupon_length", default_length))
        .ok()
        .filter(|len| (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(len))
        .ok_or_else(|| {
            AjaxError::bad_request(format!(
                "Coupon length must be between {MIN_CODE_LENGTH} and {MAX_CODE_LENGTH}"
            ))
        })?;

    Ok(GenerateRequest {
        form_id,
        prefix: params.text_or("coupon_prefix", ""),
        code_length,
        amount_type: params.text_or("amount_type", AmountType::Percentage.as_str()),
        amount_value: params.text_or("amount_value", "0"),
        start_date: params.text_or("start_date", ""),
        expiry_date: params.text_or("expiry_date", ""),
        usage_limit: params.int_or("usage_limit", 1),
        is_stackable: params.int_or("is_stackable", 0),
        quantity,
    })
}

async fn generate(state: &AppState, params: &AjaxParams) -> Result<Response, AjaxError> {
    let request = generate_request(params)?;
    info!(
        form_id = request.form_id,
        quantity = request.quantity,
        "Generating coupons"
    );

    let summary = generate_coupons(state.db(), &request).await?;
    Ok(AjaxResponse::success(summary).into_response())
}

/// Builds the update action named `name` from the `new_*` fields.
///
/// Unknown names still run the batch so every code gets a result row.
fn update_action(name: &str, params: &AjaxParams) -> UpdateAction {
    let Some(kind) = UpdateKind::parse(name) else {
        return UpdateAction::Unsupported {
            name: name.to_string(),
        };
    };

    match kind {
        UpdateKind::Discount => UpdateAction::Discount {
            amount_type: AmountType::parse(&params.text_or("new_amount_type", "")),
            amount_value: params.text_or("new_amount_value", ""),
        },
        UpdateKind::Dates => UpdateAction::Dates {
            start_date: params.text_or("new_start_date", ""),
            expiry_date: params.text("new_expiry_date"),
        },
        UpdateKind::Usage => UpdateAction::Usage {
            usage_limit: params.int_or("new_usage_limit", 1),
        },
        UpdateKind::Stackable => UpdateAction::Stackable {
            is_stackable: params.int_or("new_is_stackable", 0) != 0,
        },
        UpdateKind::Activate => UpdateAction::Activate,
        UpdateKind::Deactivate => UpdateAction::Deactivate,
    }
}

async fn update(state: &AppState, params: &AjaxParams) -> Result<Response, AjaxError> {
    let csv_content = params.textarea("csv_content");
    let action_name = params.text_or("update_action", "");
    if csv_content.is_empty() || action_name.is_empty() {
        return Err(AjaxError::bad_request("Missing required parameters"));
    }

    let codes = extract_coupon_codes(&csv_content)?;
    let action = update_action(&action_name, params);
    if matches!(action, UpdateAction::Unsupported { .. }) {
        warn!(action = %action_name, "Unknown update action, no changes will be applied");
    }

    info!(action = action.name(), codes = codes.len(), "Updating coupons");
    let report = update_coupons(state.db(), &codes, &action).await;
    Ok(AjaxResponse::success(report).into_response())
}
