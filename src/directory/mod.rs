//! Directory module
//!
//! The engine's view of the chat workspace: read access to channels, roles
//! and members, and the handful of mutations a reset needs. The concrete
//! client lives in [`crate::discord`]; tests substitute an in-memory one.

pub mod types;

pub use types::{
    Capability, Channel, ChannelId, ChannelKind, Member, Overwrite, PermValue, Role, RoleId, UserId,
};

use crate::error::DirectoryResult;
// async_trait required for dyn-compatibility with Arc<dyn Directory>
use async_trait::async_trait;
use std::sync::Arc;

/// Access to one chat workspace
///
/// Every mutation is idempotent: calling it twice with the same arguments
/// leaves the same state as calling it once.
#[async_trait]
pub trait Directory: Send + Sync {
    /// All text channels
    async fn list_text_channels(&self) -> DirectoryResult<Vec<Channel>>;

    /// All roles, including the everyone role
    async fn list_roles(&self) -> DirectoryResult<Vec<Role>>;

    /// All members
    async fn list_members(&self) -> DirectoryResult<Vec<Member>>;

    /// Replace the overlay of `role` on `channel`
    async fn set_overwrite(
        &self,
        channel: ChannelId,
        role: RoleId,
        overwrite: Overwrite,
    ) -> DirectoryResult<()>;

    /// Reset a channel's overlays to those of its parent category
    async fn sync_permissions(&self, channel: ChannelId) -> DirectoryResult<()>;

    /// Delete up to `limit` messages (all when `None`); returns how many
    async fn purge_messages(&self, channel: ChannelId, limit: Option<usize>)
    -> DirectoryResult<usize>;

    /// Take a role away from a member
    async fn remove_role(&self, member: UserId, role: RoleId) -> DirectoryResult<()>;

    /// Set or clear a member's nickname
    async fn set_nickname(&self, member: UserId, nickname: Option<String>) -> DirectoryResult<()>;
}

/// Shared directory handle
pub type SharedDirectory = Arc<dyn Directory>;
