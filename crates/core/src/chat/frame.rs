//! Decoding of EventSub WebSocket frames.

use crate::chat::ChatResult;
use mcb_protocol::chat_models::{
    ChatMessage, ChatNotification, FrameEnvelope, Session, WelcomeMessage,
    MESSAGE_TYPE_KEEPALIVE, MESSAGE_TYPE_NOTIFICATION, MESSAGE_TYPE_WELCOME,
};

/// A decoded EventSub frame.
#[derive(Debug, Clone)]
pub enum Frame {
    Welcome(Session),
    KeepAlive,
    Notification(ChatMessage),
    /// Any other message type (reconnect, revocation, ...).
    Other(String),
}

/// Decode one text frame.
pub fn decode_frame(text: &str) -> ChatResult<Frame> {
    let envelope: FrameEnvelope = serde_json::from_str(text)?;

    let frame = match envelope.metadata.message_type.as_str() {
        MESSAGE_TYPE_WELCOME => {
            let welcome: WelcomeMessage = serde_json::from_str(text)?;
            Frame::Welcome(welcome.payload.session)
        }
        MESSAGE_TYPE_KEEPALIVE => Frame::KeepAlive,
        MESSAGE_TYPE_NOTIFICATION => {
            let notification: ChatNotification = serde_json::from_str(text)?;
            let event = notification.payload.event;
            Frame::Notification(ChatMessage {
                sender: event.chatter_user_login,
                text: event.message.text,
            })
        }
        _ => Frame::Other(envelope.metadata.message_type),
    };
    Ok(frame)
}
