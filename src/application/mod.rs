//! Application layer containing the message processing orchestration.
//!
//! This module defines the `VoucherEngine`, the entry point that turns inbound
//! messages into vouchers. It decides per message id whether to replay the
//! stored voucher, rebuild it, or reject the request.

pub mod engine;
mod key_lock;
