//! Chat platform wire formats.
//!
//! These structures mirror the subset of the Twitch EventSub WebSocket and
//! Helix HTTP APIs that the bridge uses. Only the fields the bridge reads
//! are modelled; everything else is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// `metadata.message_type` of the first frame on a new EventSub session.
pub const MESSAGE_TYPE_WELCOME: &str = "session_welcome";

/// `metadata.message_type` of the periodic keep-alive frame.
pub const MESSAGE_TYPE_KEEPALIVE: &str = "session_keepalive";

/// `metadata.message_type` of a frame carrying a subscribed event.
pub const MESSAGE_TYPE_NOTIFICATION: &str = "notification";

/// Subscription type for chat messages.
pub const CHAT_MESSAGE_SUBSCRIPTION: &str = "channel.chat.message";

/// A chat message delivered to the bridge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Login of the chatter, when known.
    pub sender: Option<String>,

    /// Message text, verbatim.
    pub text: String,
}

impl ChatMessage {
    /// Message without a known sender.
    pub fn anonymous(text: impl Into<String>) -> Self {
        Self {
            sender: None,
            text: text.into(),
        }
    }
}

/// Envelope shared by every EventSub frame.
#[derive(Deserialize, Debug, Clone)]
pub struct FrameEnvelope {
    pub metadata: FrameMetadata,
}

/// Metadata block of an EventSub frame.
#[derive(Deserialize, Debug, Clone)]
pub struct FrameMetadata {
    pub message_id: String,
    pub message_type: String,
}

/// `session_welcome` frame.
#[derive(Deserialize, Debug, Clone)]
pub struct WelcomeMessage {
    pub payload: WelcomePayload,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WelcomePayload {
    pub session: Session,
}

/// EventSub session description.
#[derive(Deserialize, Debug, Clone)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub status: String,
}

/// `notification` frame for a `channel.chat.message` subscription.
#[derive(Deserialize, Debug, Clone)]
pub struct ChatNotification {
    pub payload: ChatNotificationPayload,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChatNotificationPayload {
    pub event: ChatEvent,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChatEvent {
    #[serde(default)]
    pub chatter_user_login: Option<String>,
    pub message: ChatEventMessage,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChatEventMessage {
    pub text: String,
}

/// Body of `POST /helix/eventsub/subscriptions`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub condition: SubscriptionCondition,
    pub transport: SubscriptionTransport,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionCondition {
    pub broadcaster_user_id: String,
    pub user_id: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionTransport {
    pub method: String,
    pub session_id: String,
}

impl SubscriptionRequest {
    /// Subscribe a WebSocket session to a user's own chat.
    pub fn chat_messages(user_id: &str, session_id: &str) -> Self {
        Self {
            kind: CHAT_MESSAGE_SUBSCRIPTION.to_string(),
            version: "1".to_string(),
            condition: SubscriptionCondition {
                broadcaster_user_id: user_id.to_string(),
                user_id: user_id.to_string(),
            },
            transport: SubscriptionTransport {
                method: "websocket".to_string(),
                session_id: session_id.to_string(),
            },
        }
    }
}

/// Response of the OAuth token endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
}

/// Response of `GET /helix/users`.
#[derive(Deserialize, Debug, Clone)]
pub struct UserList {
    pub data: Vec<UserInfo>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserInfo {
    pub id: String,
}
