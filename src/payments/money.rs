//! Conversion between ledger amounts (major unit decimals) and gateway
//! amounts (integer minor units). Nothing else in the crate multiplies or
//! divides by the subunit factor.

use crate::error::{AppError, AppResult};
use bigdecimal::{BigDecimal, ToPrimitive};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::str::FromStr;

/// Kobo per naira
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

pub fn to_minor_units(amount: &BigDecimal) -> AppResult<i64> {
    let scaled = amount.clone() * BigDecimal::from(MINOR_UNITS_PER_MAJOR);
    if !scaled.is_integer() {
        return Err(AppError::validation(
            "amount",
            format!("{} has more than two decimal places", amount),
        ));
    }
    scaled
        .to_i64()
        .ok_or_else(|| AppError::validation("amount", format!("{} is out of range", amount)))
}

pub fn from_minor_units(minor: i64) -> BigDecimal {
    BigDecimal::from(minor) / BigDecimal::from(MINOR_UNITS_PER_MAJOR)
}

/// Read a major-unit amount from a JSON number or string without passing it
/// through binary floating point.
pub fn deserialize_major_amount<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(number) => number.to_string(),
        serde_json::Value::String(text) => text.trim().to_string(),
        other => {
            return Err(de::Error::custom(format!(
                "expected a decimal amount, got {}",
                other
            )))
        }
    };
    BigDecimal::from_str(&text).map_err(de::Error::custom)
}
