use crate::domain::rule::{Rule, RuleKey};
use crate::error::{Result, VoucherError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RuleRow {
    trans_type: String,
    amount_type: String,
    debit_account: String,
    credit_account: String,
}

impl From<RuleRow> for Rule {
    fn from(row: RuleRow) -> Self {
        Rule::new(
            RuleKey::new(row.trans_type, row.amount_type),
            row.debit_account,
            row.credit_account,
        )
    }
}

/// Reads a rule catalogue from a CSV source.
///
/// Expects the header `trans_type,amount_type,debit_account,credit_account`.
/// Whitespace around fields is trimmed.
pub struct RuleReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RuleReader<R> {
    /// Creates a new `RuleReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes rules.
    pub fn rules(self) -> impl Iterator<Item = Result<Rule>> {
        self.reader
            .into_deserialize::<RuleRow>()
            .map(|result| result.map(Rule::from).map_err(VoucherError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_catalogue() {
        let data = "trans_type, amount_type, debit_account, credit_account\n\
                    loan_repayplan, principal, 1221.01.01, 1012.X.02\n\
                    loan_repayplan, interest, 1221.01.02, 6001.03.01";
        let rules: Vec<Rule> = RuleReader::new(data.as_bytes())
            .rules()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].key, RuleKey::new("loan_repayplan", "principal"));
        assert_eq!(rules[0].template.credit_account, "1012.X.02");
        assert_eq!(rules[1].template.debit_account, "1221.01.02");
    }

    #[test]
    fn test_reader_short_row() {
        let data = "trans_type,amount_type,debit_account,credit_account\nloan_repayplan,principal";
        let results: Vec<Result<Rule>> = RuleReader::new(data.as_bytes()).rules().collect();

        assert!(matches!(results[0], Err(VoucherError::Csv(_))));
    }
}
