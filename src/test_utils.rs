//! Shared test utilities for the coupon manager.
//!
//! This module provides common helper functions for setting up test databases
//! and creating coupon rows with sensible defaults.

use crate::{
    api::AppState,
    config::settings::parse_config,
    core::{
        feed,
        generate::GenerateRequest,
        meta::{AmountType, CouponMeta, FeedMeta, PLACEHOLDER_COUPON_NAME},
    },
    entities::{addon_feed, form},
    errors::{Error, Result},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use secrecy::SecretString;

/// Bearer token of the test admin holding both capabilities.
pub const ADMIN_TOKEN: &str = "admin-token";
/// Bearer token of a test admin with no capabilities.
pub const VIEWER_TOKEN: &str = "viewer-token";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Coupon payload with sensible defaults.
///
/// # Defaults
/// * form: 1
/// * amount: 10 percent
/// * `startDate`: "2024-01-01", no expiry
/// * `usageLimit`: 1, not stackable
#[must_use]
pub fn sample_meta(code: &str) -> CouponMeta {
    CouponMeta {
        gravity_form: 1,
        coupon_name: PLACEHOLDER_COUPON_NAME.to_string(),
        coupon_code: code.to_string(),
        coupon_amount_type: AmountType::Percentage,
        coupon_amount: "10".to_string(),
        start_date: "2024-01-01".to_string(),
        end_date: String::new(),
        usage_limit: 1,
        is_stackable: false,
    }
}

/// Inserts a coupon for form 1 using [`sample_meta`].
pub async fn create_test_coupon(
    db: &DatabaseConnection,
    code: &str,
) -> Result<addon_feed::Model> {
    feed::insert_coupon(db, 1, &sample_meta(code)).await
}

/// Inserts a feed row with arbitrary slug and meta text. Returns the new id.
/// Use this for rows owned by other add-ons or with corrupt meta.
pub async fn insert_raw_feed(
    db: &DatabaseConnection,
    form_id: i64,
    addon_slug: &str,
    meta: &str,
) -> Result<i64> {
    let row = addon_feed::ActiveModel {
        form_id: Set(form_id),
        is_active: Set(true),
        feed_order: Set(0),
        meta: Set(meta.to_string()),
        addon_slug: Set(addon_slug.to_string()),
        ..Default::default()
    };
    Ok(row.insert(db).await?.id)
}

/// Reads back and decodes the stored meta of coupon `id`.
pub async fn stored_meta(db: &DatabaseConnection, id: i64) -> Result<FeedMeta> {
    let row = feed::get_coupon_by_id(db, id).await?.ok_or_else(|| Error::Config {
        message: format!("coupon {id} not found"),
    })?;
    FeedMeta::decode(&row.meta).ok_or_else(|| Error::Config {
        message: format!("coupon {id} has undecodable meta"),
    })
}

/// Generation request with the admin form's defaults.
///
/// # Defaults
/// * `prefix`: "TEST_", `code_length`: 8
/// * amount: 10 percent, no dates
/// * `usage_limit`: 1, not stackable
#[must_use]
pub fn generate_request(form_id: i64, quantity: u32) -> GenerateRequest {
    GenerateRequest {
        form_id,
        prefix: "TEST_".to_string(),
        code_length: 8,
        amount_type: "percentage".to_string(),
        amount_value: "10".to_string(),
        start_date: String::new(),
        expiry_date: String::new(),
        usage_limit: 1,
        is_stackable: 0,
        quantity,
    }
}

/// Inserts a form row.
pub async fn insert_form(
    db: &DatabaseConnection,
    id: i64,
    title: &str,
    is_active: bool,
    is_trash: bool,
) -> Result<form::Model> {
    let row = form::ActiveModel {
        id: Set(id),
        title: Set(title.to_string()),
        is_active: Set(is_active),
        is_trash: Set(is_trash),
    };
    row.insert(db).await.map_err(Into::into)
}

/// Application state over a fresh in-memory database.
///
/// Two admins are configured: `admin` ([`ADMIN_TOKEN`]) with every capability
/// and `viewer` ([`VIEWER_TOKEN`]) with none.
pub async fn test_state(profile: &str) -> Result<AppState> {
    let config = parse_config(&format!(
        r#"
        profile = "{profile}"

        [[admins]]
        login = "admin"
        token = "{ADMIN_TOKEN}"
        capabilities = ["manage_options", "gravityforms_edit_forms"]

        [[admins]]
        login = "viewer"
        token = "{VIEWER_TOKEN}"
        "#
    ))?;
    let db = setup_test_db().await?;
    Ok(AppState::new(config, db, SecretString::from("test-nonce-secret")))
}
