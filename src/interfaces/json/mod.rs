//! Newline-delimited JSON shaped like the message HTTP API: one request object
//! per input line and one response object per output line.

pub mod message_reader;
pub mod response_writer;
