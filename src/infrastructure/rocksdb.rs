use crate::domain::ports::{MessageLedger, VoucherStore};
use crate::domain::record::MessageRecord;
use crate::domain::voucher::Voucher;
use crate::error::{Result, VoucherError};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family holding the current voucher of each message.
pub const CF_VOUCHERS: &str = "vouchers";
/// Column Family holding message processing records.
pub const CF_MESSAGES: &str = "messages";

/// A persistent store implementation using RocksDB.
///
/// Serves as both the voucher store and the message ledger, keeping each in
/// its own Column Family keyed by message id. Values are stored as JSON.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("vouchers" and "messages") exist.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_vouchers = ColumnFamilyDescriptor::new(CF_VOUCHERS, Options::default());
        let cf_messages = ColumnFamilyDescriptor::new(CF_MESSAGES, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_vouchers, cf_messages])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| VoucherError::storage(format!("{name} column family not found")))
    }

    fn put<T: Serialize>(&self, cf_name: &str, key: &str, value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)
            .map_err(|e| VoucherError::storage(format!("Serialization error: {e}")))?;
        self.db.put_cf(cf, key.as_bytes(), bytes)?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, cf_name: &str, key: &str) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_pinned_cf(cf, key.as_bytes())? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| VoucherError::storage(format!("Deserialization error: {e}")))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl VoucherStore for RocksDBStore {
    async fn save(&self, voucher: Voucher) -> Result<()> {
        self.put(CF_VOUCHERS, &voucher.message_id, &voucher)
    }

    async fn delete_by_message_id(&self, message_id: &str) -> Result<()> {
        let cf = self.cf(CF_VOUCHERS)?;
        self.db.delete_cf(cf, message_id.as_bytes())?;
        Ok(())
    }

    async fn find_by_message_id(&self, message_id: &str) -> Result<Option<Voucher>> {
        self.get(CF_VOUCHERS, message_id)
    }
}

#[async_trait]
impl MessageLedger for RocksDBStore {
    async fn upsert(&self, record: MessageRecord) -> Result<()> {
        self.put(CF_MESSAGES, &record.id, &record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<MessageRecord>> {
        self.get(CF_MESSAGES, id)
    }
}
