//! Bulk coupon updates driven by a list of codes.
//!
//! Every code is handled on its own: lookup, decode, apply, persist. A failure
//! on one code is recorded in its result row and the batch moves on. Updates are
//! read-then-write without locking, so two concurrent updates of the same
//! coupon resolve as last-writer-wins.

use crate::{
    core::{
        feed,
        meta::{AmountType, FeedMeta},
    },
    entities::addon_feed,
};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use std::fmt;
use tracing::{info, instrument, warn};

const MSG_NOT_FOUND: &str = "Coupon not found";
const MSG_LOOKUP_FAILED: &str = "Failed to look up coupon";
const MSG_INVALID_DATA: &str = "Invalid coupon data";
const MSG_NO_CHANGES: &str = "No changes to apply";
const MSG_ENCODE_FAILED: &str = "Failed to encode coupon meta data";
const MSG_UPDATE_FAILED: &str = "Failed to update coupon";
const MSG_UPDATED: &str = "Coupon updated successfully";
const MSG_ACTIVATED: &str = "Coupon activated";
const MSG_DEACTIVATED: &str = "Coupon deactivated";
const MSG_STATUS_FAILED: &str = "Failed to update coupon status";

/// The kind of bulk update, as named by the admin form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Change amount type and value
    Discount,
    /// Change start and/or expiry date
    Dates,
    /// Change the usage limit
    Usage,
    /// Change the stackable flag
    Stackable,
    /// Set `is_active = 1`
    Activate,
    /// Set `is_active = 0`
    Deactivate,
}

impl UpdateKind {
    /// Parses the `update_action` form value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "discount" => Some(Self::Discount),
            "dates" => Some(Self::Dates),
            "usage" => Some(Self::Usage),
            "stackable" => Some(Self::Stackable),
            "activate" => Some(Self::Activate),
            "deactivate" => Some(Self::Deactivate),
            _ => None,
        }
    }

    /// Form value of this kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discount => "discount",
            Self::Dates => "dates",
            Self::Usage => "usage",
            Self::Stackable => "stackable",
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        }
    }
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An update kind together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Applied only when both a type and a non-empty value are given
    Discount {
        /// New amount type
        amount_type: Option<AmountType>,
        /// New amount value, without `$`
        amount_value: String,
    },
    /// `startDate` is set when non-empty; `endDate` whenever the expiry is present
    Dates {
        /// New start date
        start_date: String,
        /// New expiry date; `Some("")` clears it
        expiry_date: Option<String>,
    },
    /// Replace the usage limit
    Usage {
        /// New limit
        usage_limit: i64,
    },
    /// Replace the stackable flag
    Stackable {
        /// New flag
        is_stackable: bool,
    },
    /// Activate the coupon
    Activate,
    /// Deactivate the coupon
    Deactivate,
    /// An action name with no handler; every found coupon reports no changes
    Unsupported {
        /// The name as sent
        name: String,
    },
}

impl UpdateAction {
    /// Form value naming this action
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Discount { .. } => UpdateKind::Discount.as_str(),
            Self::Dates { .. } => UpdateKind::Dates.as_str(),
            Self::Usage { .. } => UpdateKind::Usage.as_str(),
            Self::Stackable { .. } => UpdateKind::Stackable.as_str(),
            Self::Activate => UpdateKind::Activate.as_str(),
            Self::Deactivate => UpdateKind::Deactivate.as_str(),
            Self::Unsupported { name } => name,
        }
    }

    /// Applies a meta-level change. Returns whether anything was assigned.
    fn apply(&self, meta: &mut FeedMeta) -> bool {
        match self {
            Self::Discount {
                amount_type: Some(amount_type),
                amount_value,
            } if !amount_value.is_empty() => {
                meta.set_discount(*amount_type, amount_value);
                true
            }
            Self::Discount { .. }
            | Self::Activate
            | Self::Deactivate
            | Self::Unsupported { .. } => false,
            Self::Dates {
                start_date,
                expiry_date,
            } => {
                let mut updated = false;
                if !start_date.is_empty() {
                    meta.set_start_date(start_date);
                    updated = true;
                }
                if let Some(expiry) = expiry_date {
                    meta.set_end_date(expiry);
                    updated = true;
                }
                updated
            }
            Self::Usage { usage_limit } => {
                meta.set_usage_limit(*usage_limit);
                true
            }
            Self::Stackable { is_stackable } => {
                meta.set_stackable(*is_stackable);
                true
            }
        }
    }
}

/// Whether a single code was updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    /// The change was persisted
    Success,
    /// The code was skipped; see the message
    Error,
}

/// Result for one code of a bulk update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// The code as given in the CSV
    pub coupon_code: String,
    /// Success or error
    pub status: UpdateStatus,
    /// Human-readable explanation
    pub message: String,
}

impl UpdateOutcome {
    fn success(code: &str, message: &str) -> Self {
        Self {
            coupon_code: code.to_string(),
            status: UpdateStatus::Success,
            message: message.to_string(),
        }
    }

    fn error(code: &str, message: &str) -> Self {
        Self {
            coupon_code: code.to_string(),
            status: UpdateStatus::Error,
            message: message.to_string(),
        }
    }

    /// Whether this code was updated
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == UpdateStatus::Success
    }
}

/// Per-code results of a bulk update, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    /// One entry per input code
    pub results: Vec<UpdateOutcome>,
}

impl UpdateReport {
    /// Number of codes updated
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }
}

async fn set_status<C>(db: &C, row: &addon_feed::Model, code: &str, active: bool) -> UpdateOutcome
where
    C: ConnectionTrait,
{
    match feed::set_active(db, row.id, active).await {
        Ok(_) if active => UpdateOutcome::success(code, MSG_ACTIVATED),
        Ok(_) => UpdateOutcome::success(code, MSG_DEACTIVATED),
        Err(e) => {
            warn!(id = row.id, error = %e, "Failed to update coupon status");
            UpdateOutcome::error(code, MSG_STATUS_FAILED)
        }
    }
}

/// Applies `action` to the coupon carrying `code`.
pub async fn update_coupon<C>(db: &C, code: &str, action: &UpdateAction) -> UpdateOutcome
where
    C: ConnectionTrait,
{
    let row = match feed::find_coupon_by_code(db, code).await {
        Ok(Some(row)) => row,
        Ok(None) => return UpdateOutcome::error(code, MSG_NOT_FOUND),
        Err(e) => {
            warn!(code, error = %e, "Coupon lookup failed");
            return UpdateOutcome::error(code, MSG_LOOKUP_FAILED);
        }
    };

    let Some(mut meta) = FeedMeta::decode(&row.meta) else {
        return UpdateOutcome::error(code, MSG_INVALID_DATA);
    };

    match action {
        UpdateAction::Activate => return set_status(db, &row, code, true).await,
        UpdateAction::Deactivate => return set_status(db, &row, code, false).await,
        _ => {}
    }

    if !action.apply(&mut meta) {
        return UpdateOutcome::error(code, MSG_NO_CHANGES);
    }

    let json = match meta.encode() {
        Ok(json) => json,
        Err(e) => {
            warn!(id = row.id, error = %e, "Failed to encode coupon meta");
            return UpdateOutcome::error(code, MSG_ENCODE_FAILED);
        }
    };

    match feed::update_meta(db, row.id, json).await {
        Ok(_) => UpdateOutcome::success(code, MSG_UPDATED),
        Err(e) => {
            warn!(id = row.id, error = %e, "Failed to save coupon meta");
            UpdateOutcome::error(code, MSG_UPDATE_FAILED)
        }
    }
}

/// Applies `action` to every code in order.
#[instrument(skip(db, codes, action), fields(action = action.name(), codes = codes.len()))]
pub async fn update_coupons<C>(db: &C, codes: &[String], action: &UpdateAction) -> UpdateReport
where
    C: ConnectionTrait,
{
    let mut report = UpdateReport::default();
    for code in codes {
        report.results.push(update_coupon(db, code, action).await);
    }

    info!(
        updated = report.success_count(),
        total = report.results.len(),
        "Bulk coupon update finished"
    );
    report
}
