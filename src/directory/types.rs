//! Directory types
//!
//! Channels, roles and members as the chat workspace reports them, plus the
//! permission overlay values the engine writes.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

snowflake!(
    /// Channel identity
    ChannelId
);
snowflake!(
    /// Role identity
    RoleId
);
snowflake!(
    /// Member (user) identity
    UserId
);

/// Kind of channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Text,
    Voice,
    Category,
    Other,
}

/// A channel in the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelKind,
    /// Category the channel is nested under, if any
    pub parent: Option<ChannelId>,
}

impl Channel {
    pub fn text(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ChannelId(id),
            name: name.into(),
            kind: ChannelKind::Text,
            parent: None,
        }
    }
}

/// A role in the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    /// The implicit role every member holds
    pub is_everyone: bool,
}

impl Role {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: RoleId(id),
            name: name.into(),
            is_everyone: false,
        }
    }

    pub fn everyone(id: u64) -> Self {
        Self {
            id: RoleId(id),
            name: "@everyone".to_string(),
            is_everyone: true,
        }
    }
}

/// A workspace member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: UserId,
    pub display_name: String,
    /// Service account (bot)
    pub is_bot: bool,
    /// Workspace owner
    pub is_owner: bool,
    pub roles: Vec<RoleId>,
}

/// A single channel capability managed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    View,
    Send,
}

impl Capability {
    /// Get the capability name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Capability::View => "view",
            Capability::Send => "send",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value of one capability in an overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermValue {
    Allow,
    Deny,
    /// Unset: the channel default applies
    #[default]
    Inherit,
}

impl PermValue {
    pub const fn is_set(&self) -> bool {
        !matches!(self, PermValue::Inherit)
    }
}

/// The overlay written for one role on one channel
///
/// Writing an overlay replaces whatever the role had on the channel, so a
/// capability left as `Inherit` is actively cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Overwrite {
    pub view: PermValue,
    pub send: PermValue,
}

impl Overwrite {
    pub const fn new(view: PermValue, send: PermValue) -> Self {
        Self { view, send }
    }

    pub const fn view(value: PermValue) -> Self {
        Self::new(value, PermValue::Inherit)
    }

    pub const fn send(value: PermValue) -> Self {
        Self::new(PermValue::Inherit, value)
    }

    pub fn get(&self, capability: Capability) -> PermValue {
        match capability {
            Capability::View => self.view,
            Capability::Send => self.send,
        }
    }

    /// Combine with another overlay for the same role; set values in
    /// `other` replace ours
    pub fn merge(self, other: Overwrite) -> Overwrite {
        Overwrite {
            view: if other.view.is_set() { other.view } else { self.view },
            send: if other.send.is_set() { other.send } else { self.send },
        }
    }
}
