//! Add-on feed entity - The shared GravityForms add-on configuration table.
//!
//! Every add-on stores its per-form configuration as a row with a JSON `meta`
//! payload. Coupons are the rows whose `addon_slug` is `gravityformscoupons`;
//! rows owned by other add-ons are never written by this crate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Add-on feed database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wp_gf_addon_feed")]
pub struct Model {
    /// Unique identifier, assigned by the store on insert
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The form this feed belongs to
    pub form_id: i64,
    /// Whether the feed (coupon) is currently active
    pub is_active: bool,
    /// Ordering hint between feeds of the same form, always 0 for coupons
    pub feed_order: i32,
    /// JSON payload describing the feed
    #[sea_orm(column_type = "Text")]
    pub meta: String,
    /// Slug of the add-on owning this row
    pub addon_slug: String,
}

/// The feed table has no relations we navigate
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
