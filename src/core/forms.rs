//! Read-only listing of GravityForms forms for the target-form picker.

use crate::{
    entities::{Form, form},
    errors::Result,
};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;

/// A form that coupons can be attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSummary {
    /// Form id
    pub id: i64,
    /// Form title
    pub title: String,
}

impl From<form::Model> for FormSummary {
    fn from(model: form::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
        }
    }
}

/// Lists active forms that are not in the trash, in id order.
pub async fn list_forms<C>(db: &C) -> Result<Vec<FormSummary>>
where
    C: ConnectionTrait,
{
    let forms = Form::find()
        .filter(form::Column::IsActive.eq(true))
        .filter(form::Column::IsTrash.eq(false))
        .order_by_asc(form::Column::Id)
        .all(db)
        .await?;

    Ok(forms.into_iter().map(FormSummary::from).collect())
}
