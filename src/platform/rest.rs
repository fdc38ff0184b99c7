//! REST adapter for the chat platform.
//!
//! Implements [`ChatPlatform`] against a Discord-compatible v10 HTTP API.
//! Each trait call is exactly one request (two for direct messages, which
//! first open a DM channel). Nothing is retried; non-success statuses
//! become [`AppError::Provisioning`].

use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::messages::{ButtonStyle, OutgoingMessage};
use super::{BoxFuture, ChannelKind, ChannelSpec, ChatPlatform};
use crate::config::PlatformConfig;
use crate::{AppError, Result};

const VIEW_CHANNEL: u64 = 1 << 10;
const CONNECT: u64 = 1 << 20;
const OVERWRITE_ROLE: u8 = 0;
const OVERWRITE_MEMBER: u8 = 1;
const CHANNEL_TYPE_TEXT: u8 = 0;
const CHANNEL_TYPE_VOICE: u8 = 2;

#[derive(Debug, Deserialize)]
struct CreatedChannel {
    id: String,
}

/// HTTP client bound to one guild.
pub struct RestPlatform {
    http: Client,
    api_base: String,
    guild_id: String,
    bot_token: String,
}

impl RestPlatform {
    /// Build the adapter from platform configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the bot token is empty.
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        if config.bot_token.is_empty() {
            return Err(AppError::Config("platform bot token is not loaded".into()));
        }
        Ok(Self {
            http: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_owned(),
            guild_id: config.guild_id.clone(),
            bot_token: config.bot_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.api_base))
            .header("Authorization", format!("Bot {}", self.bot_token))
    }

    async fn send(&self, op: &'static str, request: RequestBuilder) -> Result<Option<Value>> {
        let response = request
            .send()
            .await
            .map_err(|err| AppError::Provisioning(format!("{op}: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(op, %status, %body, "platform request rejected");
            return Err(AppError::Provisioning(format!("{op}: http {status}")));
        }
        debug!(op, %status, "platform request ok");
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        response
            .json::<Value>()
            .await
            .map(Some)
            .map_err(|err| AppError::Provisioning(format!("{op}: unreadable response: {err}")))
    }

    fn channel_body(&self, spec: &ChannelSpec) -> Value {
        let (channel_type, permission) = match spec.kind {
            ChannelKind::Text => (CHANNEL_TYPE_TEXT, VIEW_CHANNEL),
            ChannelKind::Voice => (CHANNEL_TYPE_VOICE, CONNECT),
        };

        // The @everyone role shares the guild id.
        let mut overwrites = vec![json!({
            "id": self.guild_id,
            "type": OVERWRITE_ROLE,
            "deny": permission.to_string(),
        })];
        overwrites.extend(spec.allowed_users.iter().map(|user| {
            json!({ "id": user, "type": OVERWRITE_MEMBER, "allow": permission.to_string() })
        }));
        overwrites.extend(spec.allowed_roles.iter().map(|role| {
            json!({ "id": role, "type": OVERWRITE_ROLE, "allow": permission.to_string() })
        }));

        let mut body = json!({
            "name": spec.name,
            "type": channel_type,
            "permission_overwrites": overwrites,
        });
        if let Some(ref parent) = spec.parent_id {
            body["parent_id"] = Value::String(parent.clone());
        }
        body
    }
}

/// Render a message with its buttons as a single action row.
#[must_use]
pub fn message_body(message: &OutgoingMessage) -> Value {
    if message.buttons.is_empty() {
        return json!({ "content": message.content });
    }
    let buttons: Vec<Value> = message
        .buttons
        .iter()
        .map(|b| {
            let style = match b.style {
                ButtonStyle::Primary => 1,
                ButtonStyle::Secondary => 2,
                ButtonStyle::Success => 3,
                ButtonStyle::Danger => 4,
            };
            json!({ "type": 2, "style": style, "label": b.label, "custom_id": b.custom_id })
        })
        .collect();
    json!({
        "content": message.content,
        "components": [{ "type": 1, "components": buttons }],
    })
}

impl ChatPlatform for RestPlatform {
    fn create_channel<'a>(&'a self, spec: ChannelSpec) -> BoxFuture<'a, String> {
        Box::pin(async move {
            let body = self.channel_body(&spec);
            let request = self
                .request(Method::POST, &format!("/guilds/{}/channels", self.guild_id))
                .json(&body);
            let value = self
                .send("create_channel", request)
                .await?
                .ok_or_else(|| AppError::Provisioning("create_channel: empty response".into()))?;
            let created: CreatedChannel = serde_json::from_value(value).map_err(|err| {
                AppError::Provisioning(format!("create_channel: missing id: {err}"))
            })?;
            Ok(created.id)
        })
    }

    fn delete_channel<'a>(&'a self, channel_id: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(Method::DELETE, &format!("/channels/{channel_id}"));
            self.send("delete_channel", request).await.map(|_| ())
        })
    }

    fn move_member<'a>(&'a self, user_id: &'a str, channel_id: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let request = self
                .request(
                    Method::PATCH,
                    &format!("/guilds/{}/members/{user_id}", self.guild_id),
                )
                .json(&json!({ "channel_id": channel_id }));
            self.send("move_member", request).await.map(|_| ())
        })
    }

    fn send_message<'a>(
        &'a self,
        channel_id: &'a str,
        message: OutgoingMessage,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let request = self
                .request(Method::POST, &format!("/channels/{channel_id}/messages"))
                .json(&message_body(&message));
            self.send("send_message", request).await.map(|_| ())
        })
    }

    fn send_direct<'a>(&'a self, user_id: &'a str, text: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let open = self
                .request(Method::POST, "/users/@me/channels")
                .json(&json!({ "recipient_id": user_id }));
            let value = self
                .send("open_direct", open)
                .await?
                .ok_or_else(|| AppError::Provisioning("open_direct: empty response".into()))?;
            let dm: CreatedChannel = serde_json::from_value(value)
                .map_err(|err| AppError::Provisioning(format!("open_direct: missing id: {err}")))?;
            let request = self
                .request(Method::POST, &format!("/channels/{}/messages", dm.id))
                .json(&json!({ "content": text }));
            self.send("send_direct", request).await.map(|_| ())
        })
    }

    fn add_role<'a>(&'a self, user_id: &'a str, role_id: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(
                Method::PUT,
                &format!("/guilds/{}/members/{user_id}/roles/{role_id}", self.guild_id),
            );
            self.send("add_role", request).await.map(|_| ())
        })
    }

    fn remove_role<'a>(&'a self, user_id: &'a str, role_id: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(
                Method::DELETE,
                &format!("/guilds/{}/members/{user_id}/roles/{role_id}", self.guild_id),
            );
            self.send("remove_role", request).await.map(|_| ())
        })
    }
}
