use crate::domain::message::ValidationError;
use crate::domain::rule::RuleKey;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VoucherError>;

#[derive(Error, Debug)]
pub enum VoucherError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("voucher rule not found for {0}")]
    RuleNotFound(RuleKey),
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("voucher id generation failed: {0}")]
    IdGeneration(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoucherError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(Box::new(std::io::Error::other(msg.into())))
    }

    /// True for failures caused by the submitted message itself rather than by
    /// the engine or its collaborators.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::RuleNotFound(_))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for VoucherError {
    fn from(err: rocksdb::Error) -> Self {
        Self::Storage(Box::new(err))
    }
}
