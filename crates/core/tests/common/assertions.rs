//! Event collection and assertion helpers.

use mcb_protocol::ipc::WrapperEvent;
use mcb_protocol::lifecycle_models::{LifecycleState, ServerEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Collect events until the read loop exits or `timeout` elapses.
#[allow(dead_code)]
pub async fn collect_events_until_exit(
    rx: &mut mpsc::Receiver<WrapperEvent>,
    timeout: Duration,
) -> Vec<WrapperEvent> {
    let mut events = Vec::new();
    let start = tokio::time::Instant::now();

    while start.elapsed() < timeout {
        match tokio::time::timeout(Duration::from_millis(100), rx.recv()).await {
            Ok(Some(event)) => {
                let is_terminal = matches!(event, WrapperEvent::ReadLoopExited { .. });
                events.push(event);
                if is_terminal {
                    break;
                }
            }
            Ok(None) => break,  // Channel closed
            Err(_) => continue, // Timeout, keep waiting
        }
    }

    events
}

/// The `(event, new state)` pairs of every accepted transition, in order.
#[allow(dead_code)]
pub fn transitions(events: &[WrapperEvent]) -> Vec<(ServerEvent, LifecycleState)> {
    events
        .iter()
        .filter_map(|e| match e {
            WrapperEvent::StateChanged { event, to, .. } => Some((*event, *to)),
            _ => None,
        })
        .collect()
}

/// Raw lines reported by the read loop, in order.
#[allow(dead_code)]
pub fn lines(events: &[WrapperEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            WrapperEvent::Line { content, .. } => Some(content.clone()),
            _ => None,
        })
        .collect()
}

/// Assert the full Offline -> Starting -> Online -> Stopping -> Offline cycle.
#[allow(dead_code)]
pub fn assert_full_cycle(events: &[WrapperEvent]) {
    assert_eq!(
        transitions(events),
        vec![
            (ServerEvent::StartRequested, LifecycleState::Starting),
            (ServerEvent::Started, LifecycleState::Online),
            (ServerEvent::StopRequested, LifecycleState::Stopping),
            (ServerEvent::Stopped, LifecycleState::Offline),
        ],
        "unexpected lifecycle transitions in {events:#?}"
    );

    let last = events.last().expect("Event sequence is empty");
    assert!(
        matches!(last, WrapperEvent::ReadLoopExited { .. }),
        "Last event should be ReadLoopExited, got: {last:?}"
    );
}
