//! Bulk coupon generation.
//!
//! One request produces `quantity` independent rows. Each row is inserted with a
//! placeholder name and then renamed once the store has assigned its id. A row
//! that fails to insert is counted and skipped; earlier rows stay committed.

use crate::{
    core::{
        code::generate_coupon_code,
        feed,
        meta::{AmountType, CouponMeta, PLACEHOLDER_COUPON_NAME, coupon_name_for},
    },
    errors::{Error, Result},
};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Largest batch a single request may generate.
pub const MAX_QUANTITY: u32 = 1000;

/// Raw generation parameters as received from the admin form.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Target form; must be positive
    pub form_id: i64,
    /// Text prepended to every code, may be empty
    pub prefix: String,
    /// Length of the random part of each code
    pub code_length: usize,
    /// `percentage` or `flat`; anything else falls back to `percentage`
    pub amount_type: String,
    /// Numeric discount value; anything non-numeric falls back to `"0"`
    pub amount_value: String,
    /// Start date, may be empty
    pub start_date: String,
    /// Expiry date, may be empty
    pub expiry_date: String,
    /// Usage limit, raised to at least 1
    pub usage_limit: i64,
    /// Non-zero means stackable
    pub is_stackable: i64,
    /// Number of coupons to create, `1..=MAX_QUANTITY`
    pub quantity: u32,
}

/// Shared settings of every coupon in a batch, after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponTemplate {
    /// Target form
    pub form_id: i64,
    /// Discount kind
    pub amount_type: AmountType,
    /// Discount value, without the `$` prefix
    pub amount_value: String,
    /// Start date
    pub start_date: String,
    /// Expiry date
    pub expiry_date: String,
    /// Usage limit, at least 1
    pub usage_limit: i64,
    /// Whether coupons combine with others
    pub is_stackable: bool,
}

impl CouponTemplate {
    /// Applies the generator's defaults to raw request values.
    #[must_use]
    pub fn from_request(request: &GenerateRequest) -> Self {
        let amount_type = AmountType::parse(&request.amount_type).unwrap_or_default();
        let amount_value = if is_numeric(&request.amount_value) {
            request.amount_value.trim().to_string()
        } else {
            "0".to_string()
        };

        Self {
            form_id: request.form_id,
            amount_type,
            amount_value,
            start_date: request.start_date.clone(),
            expiry_date: request.expiry_date.clone(),
            usage_limit: request.usage_limit.max(1),
            is_stackable: request.is_stackable != 0,
        }
    }

    /// Meta payload for one coupon with the placeholder name.
    #[must_use]
    pub fn meta_for(&self, coupon_code: String) -> CouponMeta {
        CouponMeta {
            gravity_form: self.form_id,
            coupon_name: PLACEHOLDER_COUPON_NAME.to_string(),
            coupon_code,
            coupon_amount_type: self.amount_type,
            coupon_amount: self.amount_type.format_amount(&self.amount_value),
            start_date: self.start_date.clone(),
            end_date: self.expiry_date.clone(),
            usage_limit: self.usage_limit,
            is_stackable: self.is_stackable,
        }
    }
}

/// Whether `value` reads as a finite decimal number.
fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

/// A coupon created by a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCoupon {
    /// Feed row id
    pub id: i64,
    /// Full code including the prefix
    pub coupon_code: String,
}

/// Outcome of a generation batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    /// Rows created
    pub success: u32,
    /// Attempts that did not produce a row
    pub failed: u32,
    /// Created coupons in creation order
    pub coupons: Vec<GeneratedCoupon>,
    /// Set when the batch was rejected before any attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Inserts one coupon and renames it after its id.
///
/// A failed rename is logged but the coupon is still returned: the row exists,
/// it just keeps the placeholder name.
pub async fn create_coupon<C>(
    db: &C,
    template: &CouponTemplate,
    coupon_code: String,
) -> Result<GeneratedCoupon>
where
    C: ConnectionTrait,
{
    let mut meta = template.meta_for(coupon_code);
    let row = feed::insert_coupon(db, template.form_id, &meta).await?;

    meta.coupon_name = coupon_name_for(row.id);
    let renamed = match meta.to_json() {
        Ok(json) => feed::update_meta(db, row.id, json).await,
        Err(e) => Err(e.into()),
    };
    if let Err(e) = renamed {
        warn!(id = row.id, error = %e, "Failed to rename coupon after insert");
    }

    Ok(GeneratedCoupon {
        id: row.id,
        coupon_code: meta.coupon_code,
    })
}

/// Generates `request.quantity` coupons.
///
/// # Errors
/// Returns `Error::InvalidQuantity` when the quantity is outside
/// `1..=MAX_QUANTITY`. Per-row insert failures are counted in the summary, and
/// a non-positive form id yields a summary where every attempt failed.
#[instrument(skip(db, request), fields(form_id = request.form_id, quantity = request.quantity))]
pub async fn generate_coupons<C>(db: &C, request: &GenerateRequest) -> Result<GenerationSummary>
where
    C: ConnectionTrait,
{
    if !(1..=MAX_QUANTITY).contains(&request.quantity) {
        return Err(Error::InvalidQuantity {
            quantity: request.quantity,
        });
    }

    if request.form_id <= 0 {
        let error = Error::InvalidFormId {
            form_id: request.form_id,
        };
        warn!(%error, "Rejecting generation batch");
        return Ok(GenerationSummary {
            failed: request.quantity,
            error: Some(error.to_string()),
            ..Default::default()
        });
    }

    let template = CouponTemplate::from_request(request);
    let mut summary = GenerationSummary::default();

    for _ in 0..request.quantity {
        let code = generate_coupon_code(&request.prefix, request.code_length);
        match create_coupon(db, &template, code).await {
            Ok(coupon) => {
                summary.success += 1;
                summary.coupons.push(coupon);
            }
            Err(e) => {
                warn!(error = %e, "Coupon insert failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        success = summary.success,
        failed = summary.failed,
        "Coupon generation finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::meta::FeedMeta;
    use crate::test_utils::{generate_request, setup_test_db};
    use sea_orm::{ConnectionTrait, Statement};
    use std::collections::HashSet;

    #[test]
    fn test_template_defaults() {
        let mut request = generate_request(1, 1);
        request.amount_type = "bogus".to_string();
        request.amount_value = "ten".to_string();
        request.usage_limit = -4;
        request.is_stackable = 7;

        let template = CouponTemplate::from_request(&request);
        assert_eq!(template.amount_type, AmountType::Percentage);
        assert_eq!(template.amount_value, "0");
        assert_eq!(template.usage_limit, 1);
        assert!(template.is_stackable);
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("15.50"));
        assert!(is_numeric(" 5 "));
        assert!(is_numeric("0"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("5%"));
        assert!(!is_numeric("inf"));
        assert!(!is_numeric("NaN"));
    }

    #[tokio::test]
    async fn test_generate_single_coupon() -> Result<()> {
        let db = setup_test_db().await?;
        let mut request = generate_request(3, 1);
        request.prefix = "SINGLE_".to_string();
        request.amount_value = "25".to_string();

        let summary = generate_coupons(&db, &request).await?;
        assert_eq!(summary.success, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.coupons.len(), 1);
        assert!(summary.error.is_none());

        let coupon = &summary.coupons[0];
        assert!(coupon.coupon_code.starts_with("SINGLE_"));

        let row = feed::get_coupon_by_id(&db, coupon.id).await?.unwrap();
        assert_eq!(row.form_id, 3);
        assert!(row.is_active);
        let meta: CouponMeta = serde_json::from_str(&row.meta)?;
        assert_eq!(meta.coupon_name, format!("Coupon - #{}", coupon.id));
        assert_eq!(meta.coupon_code, coupon.coupon_code);
        assert_eq!(meta.coupon_amount_type, AmountType::Percentage);
        assert_eq!(meta.coupon_amount, "25");
        assert_eq!(meta.gravity_form, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_bulk_counts_and_suffixes() -> Result<()> {
        let db = setup_test_db().await?;
        let mut request = generate_request(1, 50);
        request.prefix = "BULK_".to_string();
        request.code_length = 12;

        let summary = generate_coupons(&db, &request).await?;
        assert_eq!(summary.success + summary.failed, 50);
        assert_eq!(summary.coupons.len(), summary.success as usize);

        for coupon in &summary.coupons {
            let suffix = coupon.coupon_code.strip_prefix("BULK_").unwrap();
            assert_eq!(suffix.len(), 12);
            assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
        }

        let codes: HashSet<&str> = summary.coupons.iter().map(|c| c.coupon_code.as_str()).collect();
        assert_eq!(codes.len(), summary.coupons.len());
        assert_eq!(feed::list_coupons(&db).await?.len(), 50);
        Ok(())
    }

    #[tokio::test]
    async fn test_flat_amount_and_empty_expiry() -> Result<()> {
        let db = setup_test_db().await?;
        let mut request = generate_request(1, 1);
        request.amount_type = "flat".to_string();
        request.amount_value = "15.50".to_string();
        request.expiry_date = String::new();

        let summary = generate_coupons(&db, &request).await?;
        let row = feed::get_coupon_by_id(&db, summary.coupons[0].id).await?.unwrap();
        let meta = FeedMeta::decode(&row.meta).unwrap();

        assert_eq!(meta.get_str("couponAmountType"), Some("flat"));
        assert_eq!(meta.get_str("couponAmount"), Some("$15.50"));
        assert!(meta.contains_key("endDate"));
        assert_eq!(meta.get_str("endDate"), Some(""));
        Ok(())
    }

    #[tokio::test]
    async fn test_dates_usage_and_stackable_are_stored_as_strings() -> Result<()> {
        let db = setup_test_db().await?;
        let mut request = generate_request(1, 1);
        request.start_date = "2024-01-01".to_string();
        request.expiry_date = "2024-12-31".to_string();
        request.usage_limit = 5;
        request.is_stackable = 1;

        let summary = generate_coupons(&db, &request).await?;
        let row = feed::get_coupon_by_id(&db, summary.coupons[0].id).await?.unwrap();
        let meta = FeedMeta::decode(&row.meta).unwrap();

        assert_eq!(meta.get_str("startDate"), Some("2024-01-01"));
        assert_eq!(meta.get_str("endDate"), Some("2024-12-31"));
        assert_eq!(meta.get_str("usageLimit"), Some("5"));
        assert_eq!(meta.get_str("isStackable"), Some("1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_form_id_short_circuits() -> Result<()> {
        let db = setup_test_db().await?;

        let summary = generate_coupons(&db, &generate_request(0, 7)).await?;
        assert_eq!(summary.success, 0);
        assert_eq!(summary.failed, 7);
        assert!(summary.coupons.is_empty());
        assert_eq!(summary.error.as_deref(), Some("Invalid form_id provided"));

        let summary = generate_coupons(&db, &generate_request(-3, 2)).await?;
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.error.as_deref(), Some("Invalid form_id provided"));
        assert!(feed::list_coupons(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_quantity_bounds() -> Result<()> {
        let db = setup_test_db().await?;

        for quantity in [0, MAX_QUANTITY + 1] {
            let result = generate_coupons(&db, &generate_request(1, quantity)).await;
            assert!(matches!(result, Err(Error::InvalidQuantity { .. })));
        }
        assert_eq!(generate_coupons(&db, &generate_request(1, 1)).await?.success, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_failures_do_not_abort_batch() -> Result<()> {
        let db = setup_test_db().await?;
        // Reject every insert once two coupons exist.
        db.execute(Statement::from_string(
            db.get_database_backend(),
            "CREATE TRIGGER cap_coupons BEFORE INSERT ON wp_gf_addon_feed \
             WHEN (SELECT COUNT(*) FROM wp_gf_addon_feed) >= 2 \
             BEGIN SELECT RAISE(ABORT, 'feed table full'); END;",
        ))
        .await?;

        let summary = generate_coupons(&db, &generate_request(1, 5)).await?;
        assert_eq!(summary.success, 2);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.coupons.len(), 2);
        assert_eq!(feed::list_coupons(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_thousand_coupon_batch() -> Result<()> {
        let db = setup_test_db().await?;
        let summary = generate_coupons(&db, &generate_request(1, MAX_QUANTITY)).await?;

        assert_eq!(summary.success + summary.failed, MAX_QUANTITY);
        assert_eq!(summary.coupons.len(), summary.success as usize);

        let codes: HashSet<&str> = summary.coupons.iter().map(|c| c.coupon_code.as_str()).collect();
        if codes.len() != summary.coupons.len() {
            // Codes are not checked for uniqueness; report rather than fail.
            tracing::warn!(
                duplicates = summary.coupons.len() - codes.len(),
                "Duplicate coupon codes generated in one batch"
            );
        }
        Ok(())
    }
}
