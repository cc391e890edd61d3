use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::{info, warn};
use voucher_engine::application::engine::VoucherEngine;
use voucher_engine::domain::ports::{MessageLedgerBox, RuleResolverBox, VoucherStoreBox};
use voucher_engine::domain::rule::Rule;
use voucher_engine::infrastructure::in_memory::{InMemoryMessageLedger, InMemoryVoucherStore};
use voucher_engine::infrastructure::static_rules::StaticRuleCatalogue;
use voucher_engine::interfaces::csv::rule_reader::RuleReader;
use voucher_engine::interfaces::json::message_reader::MessageReader;
use voucher_engine::interfaces::json::response_writer::{ProcessResponse, ResponseWriter};
use voucher_engine::telemetry;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input messages, one JSON object per line
    input: PathBuf,

    /// Rule catalogue CSV (trans_type,amount_type,debit_account,credit_account).
    /// Uses the built-in catalogue when omitted.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Rebuild vouchers of already processed messages. A message may override
    /// this with its own "regenerate" field.
    #[arg(long)]
    regenerate: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn load_rules(path: Option<PathBuf>) -> Result<RuleResolverBox> {
    let Some(path) = path else {
        return Ok(Box::new(StaticRuleCatalogue::with_defaults()));
    };

    let file = File::open(&path).into_diagnostic()?;
    let rules = RuleReader::new(file)
        .rules()
        .collect::<Result<Vec<Rule>, _>>()
        .into_diagnostic()?;
    let catalogue = StaticRuleCatalogue::from_rules(rules);
    if catalogue.is_empty() {
        warn!(path = %path.display(), "rule catalogue is empty, every message will be rejected");
    } else {
        info!(path = %path.display(), rules = catalogue.len(), "loaded rule catalogue");
    }
    Ok(Box::new(catalogue))
}

#[cfg(feature = "storage-rocksdb")]
fn open_storage(db_path: Option<PathBuf>) -> Result<(VoucherStoreBox, MessageLedgerBox)> {
    use voucher_engine::infrastructure::rocksdb::RocksDBStore;

    if let Some(db_path) = db_path {
        let store = RocksDBStore::open(&db_path).into_diagnostic()?;
        info!(path = %db_path.display(), "using RocksDB storage");

        let vouchers: VoucherStoreBox = Box::new(store.clone());
        let messages: MessageLedgerBox = Box::new(store);
        return Ok((vouchers, messages));
    }
    Ok(in_memory_storage())
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_storage(db_path: Option<PathBuf>) -> Result<(VoucherStoreBox, MessageLedgerBox)> {
    if db_path.is_some() {
        warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }
    Ok(in_memory_storage())
}

fn in_memory_storage() -> (VoucherStoreBox, MessageLedgerBox) {
    let vouchers: VoucherStoreBox = Box::new(InMemoryVoucherStore::new());
    let messages: MessageLedgerBox = Box::new(InMemoryMessageLedger::new());
    (vouchers, messages)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_json);

    let rules = load_rules(cli.rules)?;
    let (vouchers, messages) = open_storage(cli.db_path)?;
    let engine = VoucherEngine::new(rules, vouchers, messages);

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = MessageReader::new(BufReader::new(file));

    let stdout = io::stdout();
    let mut writer = ResponseWriter::new(stdout.lock());
    let (mut created, mut replayed, mut failed) = (0usize, 0usize, 0usize);

    for request in reader.messages() {
        let response = match request {
            Ok(request) => {
                let regenerate = request.regenerate.unwrap_or(cli.regenerate);
                let message_id = (!request.id.is_empty()).then(|| request.id.clone());
                match engine.process_message(request.into(), regenerate).await {
                    Ok(outcome) => ProcessResponse::from(outcome),
                    Err(e) => {
                        warn!(message_id = ?message_id, error = %e, "Error processing message");
                        ProcessResponse::failed(message_id, &e)
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Error reading message");
                ProcessResponse::failed(None, &e)
            }
        };

        match &response {
            ProcessResponse::Processed { created: true, .. } => created += 1,
            ProcessResponse::Processed { created: false, .. } => replayed += 1,
            ProcessResponse::Failed { .. } => failed += 1,
        }
        writer.write_response(&response).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;

    info!(created, replayed, failed, "finished processing messages");
    Ok(())
}
