//! Integration tests for the server wrapper.
//!
//! These tests drive a [`Wrapper`] against an in-memory server and against a
//! real child process, verifying:
//! - Lifecycle transitions derived from console output
//! - Command / reply correlation
//! - Read loop exit on end of stream

mod common;

use common::*;
use mcb_core::console::mock::MockLauncher;
use mcb_core::wrapper::{Wrapper, WrapperError, WrapperOptions, SERVER_NOT_ONLINE};
use mcb_protocol::ipc::{ReadLoopExit, WrapperEvent};
use mcb_protocol::lifecycle_models::LifecycleState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_full_session_with_mock_server() {
    let (launcher, mut server) = MockLauncher::pair();
    let (events_tx, mut events_rx) = mpsc::channel(256);
    let wrapper = Arc::new(Wrapper::new(
        launcher,
        WrapperOptions::default().with_events(events_tx),
    ));

    wrapper.start().await.unwrap();
    server.boot().await.unwrap();
    wrapper
        .wait_for_state(LifecycleState::Online, WAIT)
        .await
        .unwrap();

    let sender = Arc::clone(&wrapper);
    let reply = tokio::spawn(async move { sender.send_command("/kill tibretS").await });
    assert_eq!(
        server.next_command().await.unwrap().as_deref(),
        Some("/kill tibretS")
    );
    server.emit("Killed tibretS").await.unwrap();
    assert_eq!(reply.await.unwrap().unwrap(), "Killed tibretS");

    wrapper.stop().await.unwrap();
    assert_eq!(server.next_command().await.unwrap().as_deref(), Some("stop"));
    server.emit_log("Stopping the server").await.unwrap();
    server.close_output();

    let events = collect_events_until_exit(&mut events_rx, WAIT).await;
    assert_full_cycle(&events);
    assert!(lines(&events).contains(&"Killed tibretS".to_string()));
    assert_eq!(wrapper.join().await.unwrap(), ReadLoopExit::EndOfStream);
    assert_eq!(wrapper.state(), LifecycleState::Offline);
}

#[tokio::test]
async fn test_spoofed_chat_does_not_change_state() {
    let (launcher, mut server) = MockLauncher::pair();
    let wrapper = Wrapper::new(launcher, WrapperOptions::default());
    wrapper.start().await.unwrap();
    server.boot().await.unwrap();
    wrapper
        .wait_for_state(LifecycleState::Online, WAIT)
        .await
        .unwrap();

    // A player typing a shutdown banner into chat.
    server
        .emit_log("<griefer> Stopping the server")
        .await
        .unwrap();
    server.emit("Killed nobody").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(wrapper.state(), LifecycleState::Online);
}

#[tokio::test]
async fn test_commands_rejected_while_stopping() {
    let (launcher, mut server) = MockLauncher::pair();
    let (events_tx, mut events_rx) = mpsc::channel(256);
    let wrapper = Wrapper::new(launcher, WrapperOptions::default().with_events(events_tx));
    wrapper.start().await.unwrap();
    server.boot().await.unwrap();
    server.emit_log("Stopping the server").await.unwrap();
    wrapper
        .wait_for_state(LifecycleState::Stopping, WAIT)
        .await
        .unwrap();

    assert_eq!(
        wrapper.send_command("/weather rain").await.unwrap(),
        SERVER_NOT_ONLINE
    );
    assert_eq!(wrapper.lines_written().await, 0);

    // A second shutdown banner is a rejected transition, not a state change.
    server.emit_log("Stopping the server").await.unwrap();
    server.close_output();
    let events = collect_events_until_exit(&mut events_rx, WAIT).await;
    assert!(events
        .iter()
        .any(|e| matches!(e, WrapperEvent::TransitionRejected { .. })));
    assert_full_cycle(&events);
}

#[tokio::test]
async fn test_events_without_observer() {
    let (launcher, mut server) = MockLauncher::pair();
    let wrapper = Wrapper::new(launcher, WrapperOptions::default());
    wrapper.start().await.unwrap();

    for i in 0..1000 {
        server.emit(&format!("noise {i}")).await.unwrap();
    }
    server.close_output();

    assert_eq!(wrapper.join().await.unwrap(), ReadLoopExit::EndOfStream);
    assert_eq!(wrapper.last_line().await.as_deref(), Some("noise 999"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_real_process_session() {
    let wrapper = Wrapper::new(
        scripted_server(),
        WrapperOptions::default().with_response_timeout(Some(WAIT)),
    );

    wrapper.start().await.unwrap();
    wrapper
        .wait_for_state(LifecycleState::Online, WAIT)
        .await
        .unwrap();

    let reply = wrapper.send_command("/list").await.unwrap();
    assert_eq!(reply, "[12:00:00] [Server thread/INFO]: Unknown command: /list");

    wrapper.stop().await.unwrap();
    let exit = tokio::time::timeout(WAIT, wrapper.join())
        .await
        .expect("server did not exit")
        .unwrap();
    assert_eq!(exit, ReadLoopExit::EndOfStream);
    assert_eq!(wrapper.state(), LifecycleState::Offline);
}

#[cfg(unix)]
#[tokio::test]
async fn test_killed_process_goes_offline() {
    let wrapper = Wrapper::new(scripted_server(), WrapperOptions::default());

    wrapper.start().await.unwrap();
    wrapper
        .wait_for_state(LifecycleState::Online, WAIT)
        .await
        .unwrap();

    let status = wrapper.kill().await.unwrap().expect("real process");
    assert!(!status.success());

    tokio::time::timeout(WAIT, wrapper.join())
        .await
        .expect("read loop did not exit")
        .unwrap();
    assert_eq!(wrapper.state(), LifecycleState::Offline);
    assert!(matches!(
        wrapper.wait_for_state(LifecycleState::Online, Duration::from_millis(10)).await,
        Err(WrapperError::StateTimeout { .. })
    ));
}

#[tokio::test]
async fn test_missing_executable() {
    let launcher = mcb_core::console::ProcessLauncher::new("definitely-not-a-java-runtime", vec![]);
    let wrapper = Wrapper::new(launcher, WrapperOptions::default());

    assert!(matches!(
        wrapper.start().await,
        Err(WrapperError::Launch(_))
    ));
}
