//! Chat-platform boundary.
//!
//! The [`ChatPlatform`] trait decouples the session orchestrator from the
//! concrete chat service. The orchestrator only ever provisions channels,
//! moves members, posts messages and toggles roles through this trait;
//! inbound gateway traffic arrives as [`events::PlatformEvent`] values.

pub mod events;
pub mod messages;
pub mod rest;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::Result;

pub use messages::{Button, ButtonStyle, OutgoingMessage};

/// Boxed future returned by platform and backend calls.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Channel flavour to provision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Text channel; non-members are denied visibility.
    Text,
    /// Voice channel; non-members are denied connecting.
    Voice,
}

/// Everything needed to create a private session channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    /// Channel name.
    pub name: String,
    /// Text or voice.
    pub kind: ChannelKind,
    /// Parent category, if any.
    pub parent_id: Option<String>,
    /// Users granted access.
    pub allowed_users: Vec<String>,
    /// Roles granted access.
    pub allowed_roles: Vec<String>,
}

/// Operations the orchestrator consumes from the chat platform.
///
/// Every method is a single request; implementations never retry.
pub trait ChatPlatform: Send + Sync {
    /// Create a channel and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Provisioning`](crate::AppError::Provisioning) on failure.
    fn create_channel<'a>(&'a self, spec: ChannelSpec) -> BoxFuture<'a, String>;

    /// Delete a channel.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Provisioning`](crate::AppError::Provisioning) on failure.
    fn delete_channel<'a>(&'a self, channel_id: &'a str) -> BoxFuture<'a, ()>;

    /// Move a member into a voice channel. Fails if the member is not
    /// connected to voice.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Provisioning`](crate::AppError::Provisioning) on failure.
    fn move_member<'a>(&'a self, user_id: &'a str, channel_id: &'a str) -> BoxFuture<'a, ()>;

    /// Post a message into a channel.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Provisioning`](crate::AppError::Provisioning) on failure.
    fn send_message<'a>(
        &'a self,
        channel_id: &'a str,
        message: OutgoingMessage,
    ) -> BoxFuture<'a, ()>;

    /// Send a direct notification to a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Provisioning`](crate::AppError::Provisioning) on failure.
    fn send_direct<'a>(&'a self, user_id: &'a str, text: &'a str) -> BoxFuture<'a, ()>;

    /// Grant a role.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Provisioning`](crate::AppError::Provisioning) on failure.
    fn add_role<'a>(&'a self, user_id: &'a str, role_id: &'a str) -> BoxFuture<'a, ()>;

    /// Revoke a role.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Provisioning`](crate::AppError::Provisioning) on failure.
    fn remove_role<'a>(&'a self, user_id: &'a str, role_id: &'a str) -> BoxFuture<'a, ()>;
}
