use super::key_lock::KeyedLock;
use crate::domain::message::Message;
use crate::domain::ports::{
    IdGeneratorBox, MessageLedgerBox, RuleResolverBox, UuidGenerator, VoucherStoreBox,
};
use crate::domain::record::MessageRecord;
use crate::domain::rule::{Rule, RuleKey};
use crate::domain::voucher::Voucher;
use crate::error::Result;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

/// Result of processing a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub voucher: Voucher,
    /// False when an existing voucher was replayed.
    pub created: bool,
}

/// Turns messages into vouchers with idempotency and regeneration support.
///
/// `VoucherEngine` owns the rule resolver, the voucher store and the message
/// ledger. It keeps no state of its own apart from a per-message lock, so
/// requests for the same message id run one after the other while requests for
/// different ids proceed independently.
pub struct VoucherEngine {
    rules: RuleResolverBox,
    vouchers: VoucherStoreBox,
    messages: MessageLedgerBox,
    ids: IdGeneratorBox,
    in_flight: KeyedLock,
}

impl VoucherEngine {
    /// Creates a new `VoucherEngine` using random UUIDs as voucher ids.
    ///
    /// # Arguments
    ///
    /// * `rules` - The rule catalogue.
    /// * `vouchers` - The store holding the current voucher of each message.
    /// * `messages` - The ledger of processed messages.
    pub fn new(
        rules: RuleResolverBox,
        vouchers: VoucherStoreBox,
        messages: MessageLedgerBox,
    ) -> Self {
        Self {
            rules,
            vouchers,
            messages,
            ids: Box::new(UuidGenerator),
            in_flight: KeyedLock::default(),
        }
    }

    /// Replaces the voucher id source.
    pub fn with_id_generator(mut self, ids: IdGeneratorBox) -> Self {
        self.ids = ids;
        self
    }

    /// Processes a message, replaying its existing voucher when possible.
    ///
    /// Without `regenerate`, a message that was already processed and still has
    /// a stored voucher gets that voucher back with `created == false`. A
    /// processed message whose voucher has gone missing is rebuilt. With
    /// `regenerate`, the stored voucher is deleted and a new one is built from
    /// the current rules.
    ///
    /// Invalid messages are rejected before any collaborator is touched. A
    /// missing rule for any amount line aborts the whole call without saving a
    /// voucher or updating the ledger.
    #[instrument(skip_all, fields(message_id = %message.id, regenerate = regenerate))]
    pub async fn process_message(
        &self,
        message: Message,
        regenerate: bool,
    ) -> Result<ProcessOutcome> {
        message.validate()?;

        let _guard = self.in_flight.lock(&message.id).await;

        let previous = self.messages.find_by_id(&message.id).await?;
        debug!(seen = previous.is_some(), "looked up message history");

        if let Some(record) = &previous
            && !regenerate
        {
            if let Some(voucher) = self.vouchers.find_by_message_id(&message.id).await? {
                info!(voucher_id = %voucher.id, "replaying existing voucher");
                return Ok(ProcessOutcome {
                    voucher,
                    created: false,
                });
            }
            warn!(
                last_voucher_id = %record.last_voucher_id,
                "message was processed but its voucher is missing, rebuilding"
            );
        }

        if regenerate {
            // Start from a clean slate so no stale entries survive the rebuild.
            self.vouchers.delete_by_message_id(&message.id).await?;
            if previous.is_some() {
                debug!("deleted previous voucher for regeneration");
            }
        }

        let rules = self.resolve_rules(&message)?;
        let id = self.ids.next_id()?;
        let voucher = Voucher::build(id, &message, &rules);

        self.vouchers.save(voucher.clone()).await?;
        self.messages
            .upsert(MessageRecord {
                id: message.id.clone(),
                trans_type: message.trans_type.clone(),
                processed_at: Utc::now(),
                last_voucher_id: voucher.id,
            })
            .await?;

        info!(
            voucher_id = %voucher.id,
            entries = voucher.entries.len(),
            "voucher created"
        );
        Ok(ProcessOutcome {
            voucher,
            created: true,
        })
    }

    /// Resolves one rule per amount line, stopping at the first miss.
    fn resolve_rules(&self, message: &Message) -> Result<Vec<Rule>> {
        message
            .amounts
            .iter()
            .map(|line| {
                self.rules
                    .resolve(&RuleKey::new(&message.trans_type, &line.amount_type))
            })
            .collect()
    }
}
