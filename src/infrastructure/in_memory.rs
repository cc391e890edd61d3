use crate::domain::ports::{MessageLedger, VoucherStore};
use crate::domain::record::MessageRecord;
use crate::domain::voucher::Voucher;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store holding the current voucher of each message.
///
/// Uses `Arc<RwLock<HashMap<String, Voucher>>>` keyed by message id, so cloning
/// the store shares the same map. Ideal for testing or short-lived runs where
/// persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryVoucherStore {
    by_message_id: Arc<RwLock<HashMap<String, Voucher>>>,
}

impl InMemoryVoucherStore {
    /// Creates a new, empty in-memory voucher store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.by_message_id.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.by_message_id.read().await.is_empty()
    }
}

#[async_trait]
impl VoucherStore for InMemoryVoucherStore {
    async fn save(&self, voucher: Voucher) -> Result<()> {
        let mut vouchers = self.by_message_id.write().await;
        vouchers.insert(voucher.message_id.clone(), voucher);
        Ok(())
    }

    async fn delete_by_message_id(&self, message_id: &str) -> Result<()> {
        let mut vouchers = self.by_message_id.write().await;
        vouchers.remove(message_id);
        Ok(())
    }

    async fn find_by_message_id(&self, message_id: &str) -> Result<Option<Voucher>> {
        let vouchers = self.by_message_id.read().await;
        Ok(vouchers.get(message_id).cloned())
    }
}

/// A thread-safe in-memory ledger of processed messages.
#[derive(Default, Clone)]
pub struct InMemoryMessageLedger {
    records: Arc<RwLock<HashMap<String, MessageRecord>>>,
}

impl InMemoryMessageLedger {
    /// Creates a new, empty in-memory message ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageLedger for InMemoryMessageLedger {
    async fn upsert(&self, record: MessageRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<MessageRecord>> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }
}
