use crate::domain::message::{AmountLine, Message, Metadata};
use crate::error::{Result, VoucherError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::io::BufRead;

/// Wire shape of an inbound message.
///
/// Missing fields deserialize to empty values so that they surface as
/// validation errors from the engine instead of parse errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub trans_type: String,
    #[serde(default)]
    pub occurred_at: Option<String>,
    #[serde(default)]
    pub amounts: Vec<AmountLineRequest>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    /// Per-message override of the global regenerate flag.
    #[serde(default)]
    pub regenerate: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AmountLineRequest {
    #[serde(default)]
    pub amount_type: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
}

impl From<MessageRequest> for Message {
    fn from(req: MessageRequest) -> Self {
        // Unparseable timestamps are dropped, not rejected.
        let occurred_at = req
            .occurred_at
            .as_deref()
            .filter(|ts| !ts.is_empty())
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc));

        Message {
            id: req.id,
            trans_type: req.trans_type,
            amounts: req
                .amounts
                .into_iter()
                .map(|line| AmountLine::new(line.amount_type, line.amount, line.currency))
                .collect(),
            occurred_at,
            metadata: req.metadata.unwrap_or_default(),
        }
    }
}

/// Reads messages from newline-delimited JSON.
///
/// Each non-blank line is decoded independently, so one malformed line does
/// not stop the rest of the stream.
pub struct MessageReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> MessageReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Returns an iterator that lazily reads and decodes message requests.
    pub fn messages(self) -> impl Iterator<Item = Result<MessageRequest>> {
        self.source
            .lines()
            .filter(|line| !matches!(line, Ok(text) if text.trim().is_empty()))
            .map(|line| -> Result<MessageRequest> {
                let line = line?;
                serde_json::from_str(&line).map_err(VoucherError::from)
            })
    }
}
