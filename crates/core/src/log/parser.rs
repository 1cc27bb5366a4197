//! Console line parser.

use mcb_protocol::log_models::LogRecord;
use regex::Regex;
use std::sync::LazyLock;

/// `[<timestamp>] [<thread>/<level>]: <message>`
static LOG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([0-9:]*)\] \[([^/\]]*)/([A-Za-z #]*)\]: (.*)").expect("valid regex")
});

/// Parse one console line.
///
/// Never fails: a line that does not follow the log grammar yields an empty
/// [`LogRecord`]. The match is unanchored, so a prefix such as a console
/// prompt (`> `) in front of the log line is skipped.
pub fn parse(raw: &str) -> LogRecord {
    match LOG_LINE.captures(raw) {
        Some(caps) => LogRecord::new(&caps[1], &caps[2], &caps[3], &caps[4]),
        None => LogRecord::default(),
    }
}
