use crate::application::engine::ProcessOutcome;
use crate::domain::message::Metadata;
use crate::domain::voucher::{Voucher, VoucherEntry};
use crate::error::{Result, VoucherError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{ErrorKind, Write};

pub const STATUS_CREATED: u16 = 201;
pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoucherResponse {
    pub voucher_id: String,
    pub message_id: String,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<VoucherEntry>,
    pub total_amount: i128,
    pub metadata: Metadata,
}

impl From<Voucher> for VoucherResponse {
    fn from(voucher: Voucher) -> Self {
        Self {
            voucher_id: voucher.id.to_string(),
            total_amount: voucher.total_amount(),
            message_id: voucher.message_id,
            generated_at: voucher.generated_at,
            entries: voucher.entries,
            metadata: voucher.metadata,
        }
    }
}

/// One output line, carrying the status an HTTP transport would answer with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProcessResponse {
    Processed {
        status: u16,
        created: bool,
        voucher: VoucherResponse,
    },
    Failed {
        status: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
        error: String,
    },
}

impl ProcessResponse {
    pub fn failed(message_id: Option<String>, err: &VoucherError) -> Self {
        Self::Failed {
            status: status_for_error(err),
            message_id,
            error: err.to_string(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Processed { status, .. } | Self::Failed { status, .. } => *status,
        }
    }
}

impl From<ProcessOutcome> for ProcessResponse {
    fn from(outcome: ProcessOutcome) -> Self {
        Self::Processed {
            status: if outcome.created {
                STATUS_CREATED
            } else {
                STATUS_OK
            },
            created: outcome.created,
            voucher: outcome.voucher.into(),
        }
    }
}

/// Malformed input and caller mistakes map to 400, everything else to 500.
pub fn status_for_error(err: &VoucherError) -> u16 {
    match err {
        VoucherError::Json(_) => STATUS_BAD_REQUEST,
        // Undecodable input lines, e.g. invalid UTF-8.
        VoucherError::Io(e) if e.kind() == ErrorKind::InvalidData => STATUS_BAD_REQUEST,
        err if err.is_client_error() => STATUS_BAD_REQUEST,
        _ => STATUS_INTERNAL_ERROR,
    }
}

/// Writes responses as newline-delimited JSON.
pub struct ResponseWriter<W: Write> {
    sink: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_response(&mut self, response: &ProcessResponse) -> Result<()> {
        serde_json::to_writer(&mut self.sink, response)?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::{AmountLine, Message, ValidationError};
    use crate::domain::rule::{Rule, RuleKey};
    use crate::domain::voucher::VoucherId;
    use uuid::Uuid;

    fn outcome(created: bool) -> ProcessOutcome {
        let message = Message::new("m1", "loan_repayplan")
            .with_amount(AmountLine::new("principal", 1000, "CNY"));
        let rules = vec![Rule::new(
            RuleKey::new("loan_repayplan", "principal"),
            "1221.01.01",
            "1012.X.02",
        )];
        ProcessOutcome {
            voucher: Voucher::build(VoucherId::from_uuid(Uuid::nil()), &message, &rules),
            created,
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProcessResponse::from(outcome(true)).status(), 201);
        assert_eq!(ProcessResponse::from(outcome(false)).status(), 200);

        let validation = VoucherError::from(ValidationError::NoAmounts);
        assert_eq!(status_for_error(&validation), 400);
        let missing_rule = VoucherError::RuleNotFound(RuleKey::new("a", "b"));
        assert_eq!(status_for_error(&missing_rule), 400);
        assert_eq!(status_for_error(&VoucherError::storage("down")), 500);

        let bad_bytes = VoucherError::Io(std::io::Error::new(ErrorKind::InvalidData, "bad utf-8"));
        assert_eq!(status_for_error(&bad_bytes), 400);
        let broken_pipe = VoucherError::Io(std::io::Error::new(ErrorKind::BrokenPipe, "closed"));
        assert_eq!(status_for_error(&broken_pipe), 500);
    }

    #[test]
    fn test_total_amount_serializes_beyond_i64_range() {
        let message = Message::new("m1", "loan_repayplan")
            .with_amount(AmountLine::new("principal", i64::MAX, "CNY"))
            .with_amount(AmountLine::new("principal", 1, "CNY"));
        let rules = vec![
            Rule::new(RuleKey::new("loan_repayplan", "principal"), "D", "C"),
            Rule::new(RuleKey::new("loan_repayplan", "principal"), "D", "C"),
        ];
        let voucher = Voucher::build(VoucherId::from_uuid(Uuid::nil()), &message, &rules);

        let json = serde_json::to_value(VoucherResponse::from(voucher)).unwrap();
        assert_eq!(json["total_amount"], 9_223_372_036_854_775_808u64);
    }

    #[test]
    fn test_writer_emits_one_line_per_response() {
        let mut buf = Vec::new();
        {
            let mut writer = ResponseWriter::new(&mut buf);
            writer
                .write_response(&ProcessResponse::from(outcome(true)))
                .unwrap();
            writer
                .write_response(&ProcessResponse::failed(
                    Some("m2".into()),
                    &VoucherError::from(ValidationError::MissingTransType),
                ))
                .unwrap();
            writer.flush().unwrap();
        }

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["status"], 201);
        assert_eq!(lines[0]["created"], true);
        assert_eq!(
            lines[0]["voucher"]["voucher_id"],
            "00000000000000000000000000000000"
        );
        assert_eq!(lines[0]["voucher"]["entries"][0]["debit_account"], "1221.01.01");
        assert_eq!(lines[0]["voucher"]["total_amount"], 1000);
        assert_eq!(lines[1]["status"], 400);
        assert_eq!(lines[1]["message_id"], "m2");
        assert_eq!(
            lines[1]["error"],
            "validation failed: trans_type is required"
        );
    }
}
