#![allow(dead_code)]

use serde_json::json;
use std::io::{Error, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Builds one NDJSON request line for a message.
pub fn message_line(id: &str, trans_type: &str, amounts: &[(&str, i64)]) -> String {
    let amounts: Vec<_> = amounts
        .iter()
        .map(|(amount_type, amount)| {
            json!({ "amount_type": amount_type, "amount": amount, "currency": "CNY" })
        })
        .collect();
    json!({ "id": id, "trans_type": trans_type, "amounts": amounts }).to_string()
}

pub fn write_lines(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// Writes `rows` distinct repayment messages, cycling through the default rules.
pub fn generate_messages(path: &Path, rows: usize) -> Result<(), Error> {
    let mut file = std::fs::File::create(path)?;
    for i in 1..=rows {
        let line = message_line(
            &format!("msg-{i}"),
            "loan_repayplan",
            &[("principal", 1000 + i as i64), ("interest", 10), ("fin_service", 2)],
        );
        writeln!(file, "{line}")?;
    }
    file.flush()
}

/// Parses the NDJSON written by the binary.
pub fn parse_output(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("output line is JSON"))
        .collect()
}
