//! Donation domain models and webhook payload coercion.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use uuid::Uuid;

use crate::constants::ANONYMOUS_DONATOR;
use crate::errors::{Result, ValidationError};

/// Identifier of a donation.
///
/// Providers may send either a string or a number; the id is echoed back to
/// polling clients in the shape it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DonationId {
    Number(Number),
    Text(String),
}

impl DonationId {
    /// Generates a fresh, time-ordered id for payloads that carry none.
    pub fn generate() -> Self {
        DonationId::Text(Uuid::now_v7().to_string())
    }

    /// Loose comparison against a client cursor taken from a query string.
    ///
    /// Text ids must match exactly. Numeric ids match any cursor that parses
    /// to the same number, so `"42"`, `"42.0"` and `" 42 "` all match `42`.
    pub fn matches_cursor(&self, cursor: &str) -> bool {
        match self {
            DonationId::Text(text) => text == cursor,
            DonationId::Number(number) => match (number.as_f64(), parse_numeric(cursor)) {
                (Some(id), Some(cursor)) => id == cursor,
                _ => false,
            },
        }
    }

    fn from_payload_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) if !text.is_empty() => Some(DonationId::Text(text.clone())),
            Value::Number(number) if number.as_f64().is_some_and(|n| n != 0.0) => {
                Some(DonationId::Number(number.clone()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for DonationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DonationId::Number(number) => write!(f, "{}", number),
            DonationId::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for DonationId {
    fn from(text: &str) -> Self {
        DonationId::Text(text.to_string())
    }
}

/// A donation as retained in the buffer and returned to polling clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRecord {
    pub id: DonationId,
    pub donator_name: String,
    pub amount_raw: Number,
    pub message: String,
    /// Ingestion time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Schema of the webhook body.
///
/// Only the fields the relay uses are declared; anything else the provider
/// sends is ignored. Values stay loosely typed here and are coerced when the
/// payload is converted into a [`NewDonation`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub donator_name: Option<Value>,
    #[serde(default)]
    pub amount_raw: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

/// A validated donation with every default applied, not yet stamped.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDonation {
    pub id: Option<DonationId>,
    pub donator_name: String,
    pub amount_raw: Number,
    pub message: String,
}

impl NewDonation {
    /// Validates a raw JSON body and applies the defaulting rules.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        if !payload.is_object() {
            return Err(ValidationError::InvalidInput(
                "webhook payload must be a JSON object".to_string(),
            )
            .into());
        }
        let payload = WebhookPayload::deserialize(payload)
            .map_err(|e| ValidationError::InvalidInput(e.to_string()))?;
        Ok(NewDonation::try_from(payload)?)
    }

    /// Stamps the donation with its ingestion time, generating an id if needed.
    pub fn into_record(self, received_at: DateTime<Utc>) -> DonationRecord {
        DonationRecord {
            id: self.id.unwrap_or_else(DonationId::generate),
            donator_name: self.donator_name,
            amount_raw: self.amount_raw,
            message: self.message,
            timestamp: received_at.timestamp_millis(),
        }
    }
}

impl TryFrom<WebhookPayload> for NewDonation {
    type Error = ValidationError;

    fn try_from(payload: WebhookPayload) -> std::result::Result<Self, Self::Error> {
        let amount_raw = coerce_amount(payload.amount_raw.as_ref())?;
        Ok(NewDonation {
            id: payload.id.as_ref().and_then(DonationId::from_payload_value),
            donator_name: non_empty_text(payload.donator_name.as_ref())
                .unwrap_or_else(|| ANONYMOUS_DONATOR.to_string()),
            amount_raw,
            message: non_empty_text(payload.message.as_ref()).unwrap_or_default(),
        })
    }
}

/// Result of a poll against the buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationFeed {
    pub success: bool,
    pub donations: Vec<DonationRecord>,
    pub latest_id: Option<DonationId>,
}

impl DonationFeed {
    pub fn new(donations: Vec<DonationRecord>, latest_id: Option<DonationId>) -> Self {
        Self {
            success: true,
            donations,
            latest_id,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }
}

fn non_empty_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

/// Parses a number the way a query string or text amount is read.
///
/// Accepts decimal notation plus unsigned `0x`, `0o` and `0b` literals.
fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(prefix) = trimmed.get(..2) {
        let radix = match prefix.to_ascii_lowercase().as_str() {
            "0x" => Some(16),
            "0o" => Some(8),
            "0b" => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            let digits = &trimmed[2..];
            if digits.is_empty() || digits.starts_with(['+', '-']) {
                return None;
            }
            return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
        }
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn coerce_amount(value: Option<&Value>) -> std::result::Result<Number, ValidationError> {
    let number = match value {
        None | Some(Value::Null) => {
            return Err(ValidationError::MissingField("amount_raw".to_string()))
        }
        Some(Value::Number(number)) => match number.as_f64() {
            Some(value) if number.is_f64() => number_from_f64(value)?,
            _ => number.clone(),
        },
        Some(Value::String(text)) => {
            let parsed = parse_numeric(text).ok_or_else(|| {
                ValidationError::InvalidAmount(format!("'{}' is not a number", text))
            })?;
            number_from_f64(parsed)?
        }
        Some(other) => {
            return Err(ValidationError::InvalidAmount(format!(
                "unsupported amount value {}",
                other
            )))
        }
    };

    match number.as_f64() {
        Some(amount) if amount > 0.0 => Ok(number),
        _ => Err(ValidationError::InvalidAmount(format!(
            "amount must be positive, got {}",
            number
        ))),
    }
}

/// Keeps integral amounts integral on the wire (`5000`, not `5000.0`).
fn number_from_f64(value: f64) -> std::result::Result<Number, ValidationError> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        return Ok(Number::from(value as i64));
    }
    Number::from_f64(value)
        .ok_or_else(|| ValidationError::InvalidAmount(format!("{} is not finite", value)))
}
