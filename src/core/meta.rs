//! Coupon metadata - the JSON payload stored in the feed table's `meta` column.
//!
//! The Coupons add-on reads `usageLimit` and `isStackable` as strings, so those
//! fields are native integers/booleans here and only become strings at the serde
//! boundary. Updates go through [`FeedMeta`], an untyped object view, so keys this
//! crate does not know about survive a rewrite.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Placeholder name written on insert, before the row id is known.
pub const PLACEHOLDER_COUPON_NAME: &str = "Coupon";

/// Name given to a coupon once its row id is known.
#[must_use]
pub fn coupon_name_for(id: i64) -> String {
    format!("Coupon - #{id}")
}

/// How the discount amount is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountType {
    /// Percentage off the total
    #[default]
    Percentage,
    /// Fixed amount off the total
    Flat,
}

impl AmountType {
    /// Parses the wire value (`percentage` or `flat`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "percentage" => Some(Self::Percentage),
            "flat" => Some(Self::Flat),
            _ => None,
        }
    }

    /// Wire value of this amount type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Flat => "flat",
        }
    }

    /// Formats `value` for storage: flat amounts carry a `$` prefix.
    #[must_use]
    pub fn format_amount(self, value: &str) -> String {
        match self {
            Self::Flat => format!("${value}"),
            Self::Percentage => value.to_string(),
        }
    }
}

impl fmt::Display for AmountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encodes a usage limit the way the Coupons add-on stores it.
#[must_use]
pub fn encode_usage_limit(limit: i64) -> String {
    limit.to_string()
}

/// Encodes the stackable flag the way the Coupons add-on stores it.
#[must_use]
pub const fn encode_flag(flag: bool) -> &'static str {
    if flag { "1" } else { "0" }
}

/// Typed coupon payload written by the generator.
///
/// Field order matches the key order the add-on itself writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponMeta {
    /// Owning form, duplicated from the `form_id` column
    pub gravity_form: i64,
    /// Display name, `"Coupon - #{id}"` once the row exists
    pub coupon_name: String,
    /// Code customers type in
    pub coupon_code: String,
    /// Percentage or flat discount
    pub coupon_amount_type: AmountType,
    /// Amount as displayed (`"$5"` for flat, `"10"` for percentage)
    pub coupon_amount: String,
    /// First day the coupon is valid, may be empty
    pub start_date: String,
    /// Last day the coupon is valid; always present, empty when open-ended
    #[serde(default)]
    pub end_date: String,
    /// Number of redemptions allowed
    #[serde(with = "string_int")]
    pub usage_limit: i64,
    /// Whether the coupon combines with others
    #[serde(with = "string_flag")]
    pub is_stackable: bool,
}

impl CouponMeta {
    /// Encodes the payload as the JSON text stored in `meta`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

mod string_int {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode_usage_limit(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(n),
            Raw::Text(s) if s.trim().is_empty() => Ok(0),
            Raw::Text(s) => s.trim().parse().map_err(D::Error::custom),
        }
    }
}

mod string_flag {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(super::encode_flag(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(b),
            Raw::Int(n) => Ok(n != 0),
            Raw::Text(s) => match s.trim() {
                "" | "0" => Ok(false),
                "1" => Ok(true),
                other => Err(D::Error::custom(format!("invalid flag '{other}'"))),
            },
        }
    }
}

/// Untyped view of a stored `meta` object used for selective updates.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedMeta(Map<String, Value>);

impl FeedMeta {
    /// Decodes stored meta text. Returns `None` unless it is a non-empty JSON object.
    #[must_use]
    pub fn decode(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) if !map.is_empty() => Some(Self(map)),
            _ => None,
        }
    }

    /// Encodes the object back to JSON text.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }

    /// The stored `couponCode`, if it is a string
    #[must_use]
    pub fn coupon_code(&self) -> Option<&str> {
        self.get_str("couponCode")
    }

    /// Reads a string-valued key
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Whether `key` exists, whatever its value
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), Value::String(value.into()));
    }

    /// Sets amount type and amount (`$`-prefixed for flat).
    pub fn set_discount(&mut self, amount_type: AmountType, value: &str) {
        self.set("couponAmountType", amount_type.as_str());
        self.set("couponAmount", amount_type.format_amount(value));
    }

    /// Sets `startDate`
    pub fn set_start_date(&mut self, date: &str) {
        self.set("startDate", date);
    }

    /// Sets `endDate`; an empty string clears the expiry.
    pub fn set_end_date(&mut self, date: &str) {
        self.set("endDate", date);
    }

    /// Sets `usageLimit` (stored as a string)
    pub fn set_usage_limit(&mut self, limit: i64) {
        self.set("usageLimit", encode_usage_limit(limit));
    }

    /// Sets `isStackable` (stored as `"0"`/`"1"`)
    pub fn set_stackable(&mut self, stackable: bool) {
        self.set("isStackable", encode_flag(stackable));
    }
}
