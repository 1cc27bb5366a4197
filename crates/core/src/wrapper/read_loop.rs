//! Background read loop over the server console.

use crate::console::ConsoleReader;
use crate::log::{classify, parse};
use crate::state::apply_event;
use crate::wrapper::Shared;
use chrono::Utc;
use mcb_protocol::ipc::{ReadLoopExit, WrapperEvent};
use mcb_protocol::lifecycle_models::{LifecycleState, ServerEvent};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Drain the console until it closes.
///
/// Every line is, in order: recorded as the last line, handed to the
/// command waiting for a reply (if any), published, then classified and
/// applied to the lifecycle. The loop ends at end-of-stream or on the first
/// read error; it never spins on a closed stream.
pub(crate) async fn run(mut reader: ConsoleReader, shared: Arc<Shared>) -> ReadLoopExit {
    let exit = loop {
        match reader.read_line().await {
            Ok(Some(line)) => handle_line(&shared, line).await,
            Ok(None) => {
                info!("server console reached end of stream");
                break ReadLoopExit::EndOfStream;
            }
            Err(e) => {
                error!(error = %e, "reading server console failed");
                break ReadLoopExit::ReadError {
                    message: e.to_string(),
                };
            }
        }
    };

    finish(&shared, &exit).await;
    exit
}

async fn handle_line(shared: &Shared, line: String) {
    debug!(target: "mcb_core::server", "{line}");

    *shared.last_line.lock().await = Some(line.clone());

    if let Some(reply_tx) = shared.pending.lock().await.take() {
        // The caller may have given up waiting; the line is then simply not a reply.
        let _ = reply_tx.send(line.clone());
    }

    let event = classify(&parse(&line));

    shared.notifier.publish(WrapperEvent::Line {
        content: line,
        received_at: Utc::now(),
    });

    if event.is_trigger() {
        let _ = apply_event(&shared.machine, event, &shared.notifier);
    }
}

async fn finish(shared: &Shared, exit: &ReadLoopExit) {
    let stopped = exit.is_clean()
        && apply_event(&shared.machine, ServerEvent::Stopped, &shared.notifier).is_ok();

    if !stopped {
        // The process went away without announcing a shutdown (crash, kill, broken pipe).
        let previous = shared.machine.force(LifecycleState::Offline);
        if previous != LifecycleState::Offline {
            warn!(%previous, "server console closed unexpectedly, marking offline");
            shared.notifier.publish(WrapperEvent::StateChanged {
                from: previous,
                to: LifecycleState::Offline,
                event: ServerEvent::Stopped,
            });
        }
    }

    // Wakes a caller still waiting for a reply.
    drop(shared.pending.lock().await.take());

    shared.notifier.publish(WrapperEvent::ReadLoopExited {
        reason: exit.clone(),
    });
}
