use super::voucher::VoucherId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing history of a message, used for idempotency and regeneration.
///
/// A record exists once the message has been processed successfully at least
/// once, and is overwritten by every later successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub trans_type: String,
    pub processed_at: DateTime<Utc>,
    pub last_voucher_id: VoucherId,
}
