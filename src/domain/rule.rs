use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a rule by business attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleKey {
    pub trans_type: String,
    pub amount_type: String,
}

impl RuleKey {
    pub fn new(trans_type: impl Into<String>, amount_type: impl Into<String>) -> Self {
        Self {
            trans_type: trans_type.into(),
            amount_type: amount_type.into(),
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.trans_type, self.amount_type)
    }
}

/// Debit/credit account pair used to build a voucher entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub debit_account: String,
    pub credit_account: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub key: RuleKey,
    pub template: Template,
}

impl Rule {
    pub fn new(
        key: RuleKey,
        debit_account: impl Into<String>,
        credit_account: impl Into<String>,
    ) -> Self {
        Self {
            key,
            template: Template {
                debit_account: debit_account.into(),
                credit_account: credit_account.into(),
            },
        }
    }
}
