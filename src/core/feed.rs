//! Coupon feed store - Row-level access to coupons in the shared feed table.
//!
//! Every query here is scoped to the coupons add-on slug, so rows owned by other
//! add-ons are invisible to the rest of the crate. Writes are single-row
//! statements; there is no cross-row transaction.

use crate::{
    core::meta::{CouponMeta, FeedMeta},
    entities::{AddonFeed, addon_feed},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::LikeExpr};

/// Slug identifying rows owned by the GravityForms Coupons add-on.
pub const COUPONS_ADDON_SLUG: &str = "gravityformscoupons";

const LIKE_ESCAPE: char = '!';

/// Escapes `LIKE` wildcards so `text` only matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// `LIKE` pattern matching a meta object that contains `"couponCode":"<code>"`.
fn coupon_code_pattern(code: &str) -> Result<String> {
    let needle = format!("\"couponCode\":{}", serde_json::to_string(code)?);
    Ok(format!("%{}%", escape_like(&needle)))
}

/// Inserts a new, active coupon row for `form_id` with the given payload.
pub async fn insert_coupon<C>(db: &C, form_id: i64, meta: &CouponMeta) -> Result<addon_feed::Model>
where
    C: ConnectionTrait,
{
    let row = addon_feed::ActiveModel {
        form_id: Set(form_id),
        is_active: Set(true),
        feed_order: Set(0),
        meta: Set(meta.to_json()?),
        addon_slug: Set(COUPONS_ADDON_SLUG.to_string()),
        ..Default::default()
    };

    row.insert(db).await.map_err(Into::into)
}

/// Replaces the `meta` text of coupon `id`. Returns the number of rows touched.
pub async fn update_meta<C>(db: &C, id: i64, meta_json: String) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = AddonFeed::update_many()
        .col_expr(addon_feed::Column::Meta, Expr::value(meta_json))
        .filter(addon_feed::Column::Id.eq(id))
        .filter(addon_feed::Column::AddonSlug.eq(COUPONS_ADDON_SLUG))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Sets the `is_active` column of coupon `id`. Returns the number of rows touched.
pub async fn set_active<C>(db: &C, id: i64, active: bool) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = AddonFeed::update_many()
        .col_expr(addon_feed::Column::IsActive, Expr::value(active))
        .filter(addon_feed::Column::Id.eq(id))
        .filter(addon_feed::Column::AddonSlug.eq(COUPONS_ADDON_SLUG))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Finds a coupon row by its id.
pub async fn get_coupon_by_id<C>(db: &C, id: i64) -> Result<Option<addon_feed::Model>>
where
    C: ConnectionTrait,
{
    AddonFeed::find_by_id(id)
        .filter(addon_feed::Column::AddonSlug.eq(COUPONS_ADDON_SLUG))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the coupon whose meta carries `couponCode == code`.
///
/// The database does a substring `LIKE` scan over the JSON text, which is case
/// insensitive on common collations. Candidates are therefore confirmed against
/// the decoded code. A candidate whose meta does not decode is returned as-is so
/// the caller can report it as corrupt. Lowest id wins when codes repeat.
pub async fn find_coupon_by_code<C>(db: &C, code: &str) -> Result<Option<addon_feed::Model>>
where
    C: ConnectionTrait,
{
    let candidates = AddonFeed::find()
        .filter(addon_feed::Column::AddonSlug.eq(COUPONS_ADDON_SLUG))
        .filter(
            addon_feed::Column::Meta
                .like(LikeExpr::new(coupon_code_pattern(code)?).escape(LIKE_ESCAPE)),
        )
        .order_by_asc(addon_feed::Column::Id)
        .all(db)
        .await?;

    Ok(candidates.into_iter().find(|row| {
        FeedMeta::decode(&row.meta).is_none_or(|meta| meta.coupon_code() == Some(code))
    }))
}

/// All coupon rows, oldest first.
pub async fn list_coupons<C>(db: &C) -> Result<Vec<addon_feed::Model>>
where
    C: ConnectionTrait,
{
    AddonFeed::find()
        .filter(addon_feed::Column::AddonSlug.eq(COUPONS_ADDON_SLUG))
        .order_by_asc(addon_feed::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
