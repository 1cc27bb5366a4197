//! Lifecycle event classification.
//!
//! Patterns are tried in order and the first match wins. They are anchored
//! at the start of the message so that a player typing "Stopping the server"
//! in chat (logged as `<player> Stopping the server`) does not look like a
//! shutdown.

use crate::log::parser::parse;
use mcb_protocol::lifecycle_models::ServerEvent;
use mcb_protocol::log_models::LogRecord;
use regex::Regex;
use std::sync::LazyLock;

static EVENT_PATTERNS: LazyLock<Vec<(Regex, ServerEvent)>> = LazyLock::new(|| {
    [
        (r#"^Done (?s)(.*)! For help, type "help""#, ServerEvent::Started),
        (r"^Starting minecraft server version (.*)", ServerEvent::StartRequested),
        (r"^Stopping (.*) server", ServerEvent::StopRequested),
    ]
    .into_iter()
    .map(|(pattern, event)| (Regex::new(pattern).expect("valid regex"), event))
    .collect()
});

/// Classify a parsed record.
///
/// Returns [`ServerEvent::None`] when no pattern matches, including for the
/// empty record of an unparsable line.
pub fn classify(record: &LogRecord) -> ServerEvent {
    EVENT_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&record.message))
        .map_or(ServerEvent::None, |(_, event)| *event)
}

/// Parse and classify a raw console line.
pub fn classify_line(raw: &str) -> ServerEvent {
    classify(&parse(raw))
}
