//! Domain model: messages, rules, vouchers and the ports the engine depends on.

pub mod message;
pub mod ports;
pub mod record;
pub mod rule;
pub mod voucher;
