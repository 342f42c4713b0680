//! Form entity - Read-only view of the GravityForms forms registry.
//!
//! Only the columns needed to offer a target form for generated coupons are
//! mapped. Forms are owned by GravityForms and never written here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Form database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wp_gf_form")]
pub struct Model {
    /// Form identifier referenced by `form_id` in the feed table
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Title shown to administrators
    pub title: String,
    /// Whether the form is active
    pub is_active: bool,
    /// Soft delete flag - trashed forms are hidden from listings
    pub is_trash: bool,
}

/// `Form` has no relationships we navigate
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
