//! Twitch chat over EventSub.
//!
//! Connecting takes three steps:
//! 1. [`TwitchClient::exchange_code`] turns an OAuth authorization code into
//!    a user access token (skipped when a token is already configured)
//! 2. [`TwitchClient::connect`] opens the EventSub WebSocket and waits for
//!    the welcome frame, which carries the session id
//! 3. [`TwitchClient::subscribe_chat`] registers a `channel.chat.message`
//!    subscription for that session
//!
//! After that, [`TwitchChatSource`] yields one [`ChatMessage`] per chat line.

use crate::chat::frame::{decode_frame, Frame};
use crate::chat::{ChatError, ChatResult, ChatSource};
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use mcb_protocol::chat_models::{ChatMessage, SubscriptionRequest, TokenResponse, UserList};
use mcb_protocol::config_models::ChatConfig;
use std::time::Duration;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

pub const EVENTSUB_URL: &str = "wss://eventsub.wss.twitch.tv/ws";
pub const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
pub const USERS_URL: &str = "https://api.twitch.tv/helix/users";
pub const SUBSCRIPTIONS_URL: &str = "https://api.twitch.tv/helix/eventsub/subscriptions";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Application credentials read from the environment.
#[derive(Debug, Clone)]
pub struct TwitchCredentials {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
}

impl TwitchCredentials {
    pub const CLIENT_ID_VAR: &'static str = "TWITCH_CLIENT_ID";
    pub const CLIENT_SECRET_VAR: &'static str = "TWITCH_CLIENT_SECRET";
    pub const ACCESS_TOKEN_VAR: &'static str = "TWITCH_ACCESS_TOKEN";

    /// Read credentials from `TWITCH_CLIENT_ID`, `TWITCH_CLIENT_SECRET` and
    /// `TWITCH_ACCESS_TOKEN`. Only the client id is mandatory.
    pub fn from_env() -> ChatResult<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        Ok(Self {
            client_id: var(Self::CLIENT_ID_VAR).ok_or(ChatError::MissingCredential(Self::CLIENT_ID_VAR))?,
            client_secret: var(Self::CLIENT_SECRET_VAR),
            access_token: var(Self::ACCESS_TOKEN_VAR),
        })
    }
}

/// HTTP and WebSocket access to Twitch.
pub struct TwitchClient {
    http: reqwest::Client,
    credentials: TwitchCredentials,
    config: ChatConfig,
}

impl TwitchClient {
    pub fn new(credentials: TwitchCredentials, config: ChatConfig) -> ChatResult<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            credentials,
            config,
        })
    }

    /// Exchange an OAuth authorization code for a user access token.
    pub async fn exchange_code(&self, code: &str) -> ChatResult<String> {
        let secret = self
            .credentials
            .client_secret
            .as_deref()
            .ok_or(ChatError::MissingCredential(TwitchCredentials::CLIENT_SECRET_VAR))?;

        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", secret),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let token: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!(expires_in = token.expires_in, "obtained Twitch access token");
        Ok(token.access_token)
    }

    /// Open the EventSub WebSocket and wait for its welcome frame.
    pub async fn connect(&self) -> ChatResult<TwitchChatSource<TwitchStream>> {
        let (stream, _) = connect_async(EVENTSUB_URL).await?;
        let source = TwitchChatSource::handshake(stream).await?;
        info!(session_id = %source.session_id(), "connected to Twitch EventSub");
        Ok(source)
    }

    /// Subscribe the session to the configured broadcaster's chat.
    pub async fn subscribe_chat(&self, access_token: &str, session_id: &str) -> ChatResult<()> {
        let user_id = self.user_id(access_token, &self.config.broadcaster_login).await?;
        let request = SubscriptionRequest::chat_messages(&user_id, session_id);

        let response = self
            .http
            .post(SUBSCRIPTIONS_URL)
            .bearer_auth(access_token)
            .header("Client-Id", &self.credentials.client_id)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::SubscriptionRejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(broadcaster = %self.config.broadcaster_login, %status, "subscribed to chat messages");
        Ok(())
    }

    async fn user_id(&self, access_token: &str, login: &str) -> ChatResult<String> {
        let users: UserList = self
            .http
            .get(USERS_URL)
            .query(&[("login", login)])
            .bearer_auth(access_token)
            .header("Client-Id", &self.credentials.client_id)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        users
            .data
            .into_iter()
            .next()
            .map(|user| user.id)
            .ok_or_else(|| ChatError::UnknownUser(login.to_string()))
    }
}

/// The WebSocket stream returned by [`TwitchClient::connect`].
pub type TwitchStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Chat messages from an EventSub session.
pub struct TwitchChatSource<S> {
    stream: S,
    session_id: String,
}

impl<S> TwitchChatSource<S>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Send + Unpin,
{
    /// Read frames until the session welcome arrives.
    pub async fn handshake(mut stream: S) -> ChatResult<Self> {
        while let Some(frame) = next_frame(&mut stream).await? {
            match frame {
                Frame::Welcome(session) => {
                    return Ok(Self {
                        stream,
                        session_id: session.id,
                    })
                }
                other => debug!(?other, "ignoring frame before welcome"),
            }
        }
        Err(ChatError::HandshakeClosed)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Next decoded text frame, or `None` once the connection closes.
async fn next_frame<S>(stream: &mut S) -> ChatResult<Option<Frame>>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(message) = stream.next().await {
        match message? {
            Message::Text(text) => return decode_frame(text.as_str()).map(Some),
            Message::Close(close) => {
                info!(?close, "Twitch closed the EventSub connection");
                return Ok(None);
            }
            _ => {}
        }
    }
    Ok(None)
}

#[async_trait]
impl<S> ChatSource for TwitchChatSource<S>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Send + Unpin,
{
    async fn next_message(&mut self) -> ChatResult<Option<ChatMessage>> {
        while let Some(frame) = next_frame(&mut self.stream).await? {
            match frame {
                Frame::Notification(message) => return Ok(Some(message)),
                Frame::KeepAlive => {}
                Frame::Welcome(session) => {
                    warn!(session_id = %session.id, "unexpected second welcome frame");
                }
                Frame::Other(kind) => debug!(%kind, "ignoring EventSub frame"),
            }
        }
        Ok(None)
    }
}
