//! Server console line parsing and lifecycle event classification.
//!
//! - [`parser`]: splits a raw line into a [`LogRecord`](mcb_protocol::LogRecord)
//! - [`classifier`]: maps a record's message to a [`ServerEvent`](mcb_protocol::ServerEvent)

pub mod classifier;
pub mod parser;

pub use classifier::{classify, classify_line};
pub use parser::parse;
