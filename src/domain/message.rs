use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Opaque key/value pairs carried from a message onto its voucher.
pub type Metadata = BTreeMap<String, String>;

/// A single amount of a message, broken down by amount type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountLine {
    pub amount_type: String,
    /// Signed amount in the smallest currency unit. Never zero once validated.
    pub amount: i64,
    /// Free-form currency code, not validated.
    pub currency: String,
}

impl AmountLine {
    pub fn new(amount_type: impl Into<String>, amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount_type: amount_type.into(),
            amount,
            currency: currency.into(),
        }
    }
}

/// A business event pushed by an upstream system.
///
/// The `id` is the idempotency key: every delivery of the same id resolves to
/// the same voucher unless regeneration is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub trans_type: String,
    pub amounts: Vec<AmountLine>,
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Message {
    pub fn new(id: impl Into<String>, trans_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            trans_type: trans_type.into(),
            amounts: Vec::new(),
            occurred_at: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_amount(mut self, line: AmountLine) -> Self {
        self.amounts.push(line);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Checks the message invariants, reporting the first violated field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingId);
        }
        if self.trans_type.is_empty() {
            return Err(ValidationError::MissingTransType);
        }
        if self.amounts.is_empty() {
            return Err(ValidationError::NoAmounts);
        }
        for (line, amount) in self.amounts.iter().enumerate() {
            if amount.amount_type.is_empty() {
                return Err(ValidationError::MissingAmountType { line });
            }
            if amount.amount == 0 {
                return Err(ValidationError::ZeroAmount { line });
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("message id is required")]
    MissingId,
    #[error("trans_type is required")]
    MissingTransType,
    #[error("amount lines are required")]
    NoAmounts,
    #[error("amount_type is required (amount line {line})")]
    MissingAmountType { line: usize },
    #[error("amount must be non-zero (amount line {line})")]
    ZeroAmount { line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_message() -> Message {
        Message::new("m1", "loan_repayplan")
            .with_amount(AmountLine::new("principal", 1000, "CNY"))
            .with_amount(AmountLine::new("interest", -25, "CNY"))
    }

    #[test]
    fn test_valid_message_passes() {
        assert_eq!(valid_message().validate(), Ok(()));
    }

    #[test]
    fn test_missing_id() {
        let mut msg = valid_message();
        msg.id.clear();
        assert_eq!(msg.validate(), Err(ValidationError::MissingId));
    }

    #[test]
    fn test_missing_trans_type() {
        let mut msg = valid_message();
        msg.trans_type.clear();
        assert_eq!(msg.validate(), Err(ValidationError::MissingTransType));
    }

    #[test]
    fn test_no_amounts() {
        let msg = Message::new("m1", "loan_repayplan");
        assert_eq!(msg.validate(), Err(ValidationError::NoAmounts));
    }

    #[test]
    fn test_amount_line_violations_report_line_index() {
        let msg = valid_message().with_amount(AmountLine::new("", 10, "CNY"));
        assert_eq!(
            msg.validate(),
            Err(ValidationError::MissingAmountType { line: 2 })
        );

        let msg = valid_message().with_amount(AmountLine::new("fin_service", 0, "CNY"));
        assert_eq!(msg.validate(), Err(ValidationError::ZeroAmount { line: 2 }));
    }

    #[test]
    fn test_id_checked_before_amounts() {
        let msg = Message::new("", "");
        assert_eq!(msg.validate(), Err(ValidationError::MissingId));
    }
}
