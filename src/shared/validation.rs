use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::core::error::{AppError, Result};

/// Flatten validator output into human messages.
///
/// Fields are visited in name order so the first message is stable between
/// requests.
pub fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<(String, &Vec<ValidationError>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| (field.to_string(), errs))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid ({})", field, e.code),
            })
        })
        .collect()
}

/// Parse a path/body id. A structurally invalid id is reported exactly like a
/// missing record.
pub fn parse_resource_id(raw: &str, not_found: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(not_found.to_string()))
}

/// Rejects empty and whitespace-only strings
pub fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Largest amount a `NUMERIC(12, 2)` column holds
pub const MAX_BOUNTY_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Bounties are non-negative currency amounts with at most two decimals
pub fn bounty_amount(value: &Decimal) -> std::result::Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative")
            .with_message("Bounty amount must be 0 or more".into()));
    }
    if *value > MAX_BOUNTY_AMOUNT {
        return Err(ValidationError::new("too_large")
            .with_message("Bounty amount must be at most 9999999999.99".into()));
    }
    if value.normalize().scale() > 2 {
        return Err(ValidationError::new("scale")
            .with_message("Bounty amount can have at most 2 decimal places".into()));
    }
    Ok(())
}

/// Reads an optional id where `null`, a missing key and `""` all mean "none"
pub fn blank_as_none_uuid<'de, D>(deserializer: D) -> std::result::Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => Uuid::parse_str(raw.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
