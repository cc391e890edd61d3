use super::message::{Message, Metadata};
use super::rule::Rule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a voucher. Unique per creation, not per message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoucherId(Uuid);

impl VoucherId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for VoucherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.simple(), f)
    }
}

/// The debit/credit accounts for a single voucher line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherEntry {
    pub debit_account: String,
    pub credit_account: String,
    pub amount: i64,
    pub currency: String,
    pub amount_type: String,
}

/// Accounting entries generated for a message.
///
/// Vouchers are never mutated after construction. Regenerating the voucher of
/// a message replaces it with a new one carrying a new id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: VoucherId,
    pub message_id: String,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<VoucherEntry>,
    pub metadata: Metadata,
}

impl Voucher {
    /// Builds a voucher from a validated message and the rule resolved for each
    /// of its amount lines, in the same order.
    pub fn build(id: VoucherId, message: &Message, rules: &[Rule]) -> Self {
        debug_assert_eq!(message.amounts.len(), rules.len());

        let entries = message
            .amounts
            .iter()
            .zip(rules)
            .map(|(line, rule)| VoucherEntry {
                debit_account: rule.template.debit_account.clone(),
                credit_account: rule.template.credit_account.clone(),
                amount: line.amount,
                currency: line.currency.clone(),
                amount_type: line.amount_type.clone(),
            })
            .collect();

        Self {
            id,
            message_id: message.id.clone(),
            generated_at: Utc::now(),
            entries,
            metadata: message.metadata.clone(),
        }
    }

    /// Signed sum of the entry amounts, widened so that it cannot overflow.
    pub fn total_amount(&self) -> i128 {
        self.entries.iter().map(|entry| i128::from(entry.amount)).sum()
    }
}
