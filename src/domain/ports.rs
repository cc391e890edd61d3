use super::record::MessageRecord;
use super::rule::{Rule, RuleKey};
use super::voucher::{Voucher, VoucherId};
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Read-only access to the rule catalogue.
///
/// Implementations must report a missing rule as `VoucherError::RuleNotFound`
/// so callers can tell it apart from other failures.
pub trait RuleResolver: Send + Sync {
    fn resolve(&self, key: &RuleKey) -> Result<Rule>;
}

/// Persists the current voucher of each message.
#[async_trait]
pub trait VoucherStore: Send + Sync {
    /// Stores the voucher, replacing any voucher already held for its message.
    async fn save(&self, voucher: Voucher) -> Result<()>;
    /// Removes the voucher of a message. Absence is not an error.
    async fn delete_by_message_id(&self, message_id: &str) -> Result<()>;
    async fn find_by_message_id(&self, message_id: &str) -> Result<Option<Voucher>>;
}

/// Remembers which messages were processed and what they produced.
#[async_trait]
pub trait MessageLedger: Send + Sync {
    async fn upsert(&self, record: MessageRecord) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<MessageRecord>>;
}

/// Source of fresh voucher identifiers.
///
/// A failure is fatal to the request that asked for the id and is never retried.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Result<VoucherId>;
}

/// Random (v4) UUID identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> Result<VoucherId> {
        Ok(VoucherId::from_uuid(Uuid::new_v4()))
    }
}

pub type RuleResolverBox = Box<dyn RuleResolver>;
pub type VoucherStoreBox = Box<dyn VoucherStore>;
pub type MessageLedgerBox = Box<dyn MessageLedger>;
pub type IdGeneratorBox = Box<dyn IdGenerator>;
