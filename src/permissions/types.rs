//! Permission engine types
//!
//! Core types shared by the classifier, the rule table and the reconciler.

use crate::directory::{ChannelId, Overwrite, Role, RoleId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Channel category driving which rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Clue,
    SharedChat,
    Voicemail,
    PrivateChannel,
    Unclassified,
}

impl Category {
    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Clue => "clue",
            Category::SharedChat => "shared_chat",
            Category::Voicemail => "voicemail",
            Category::PrivateChannel => "private_channel",
            Category::Unclassified => "unclassified",
        }
    }

    /// Whether the engine writes overlays for this category
    pub fn is_managed(&self) -> bool {
        !matches!(self, Category::Unclassified)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified channel name, with the players its name refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// `<owner>-<topic>`
    Clue { owner: String },
    SharedChat,
    Voicemail,
    /// `<a>-<b>`
    Private { players: [String; 2] },
    Unclassified,
}

impl Classification {
    pub fn category(&self) -> Category {
        match self {
            Classification::Clue { .. } => Category::Clue,
            Classification::SharedChat => Category::SharedChat,
            Classification::Voicemail => Category::Voicemail,
            Classification::Private { .. } => Category::PrivateChannel,
            Classification::Unclassified => Category::Unclassified,
        }
    }
}

/// Who a grant template applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    /// The implicit role every member holds
    Everyone,
    /// The session's spectator role
    Spectator,
    /// The role named after one character
    Character(String),
    /// Every character role in play
    AllCharacters,
}

/// A rule table entry before roles are resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantTemplate {
    pub subject: Subject,
    pub overwrite: Overwrite,
}

impl GrantTemplate {
    pub fn new(subject: Subject, overwrite: Overwrite) -> Self {
        Self { subject, overwrite }
    }
}

/// A grant resolved to a concrete role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionGrant {
    pub role: RoleId,
    pub overwrite: Overwrite,
}

/// One overlay write on one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationCall {
    pub channel: ChannelId,
    pub channel_name: String,
    pub role: RoleId,
    pub overwrite: Overwrite,
}

impl fmt::Display for MutationCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} role {}", self.channel_name, self.role)
    }
}

/// Role lookup built once per operation
///
/// Role names are matched case-insensitively. Several roles may share a
/// name; all of them are returned.
#[derive(Debug, Clone, Default)]
pub struct RoleIndex {
    everyone: Option<RoleId>,
    by_name: HashMap<String, Vec<RoleId>>,
    characters: Vec<RoleId>,
    character_set: HashSet<RoleId>,
}

impl RoleIndex {
    /// Index `roles`, marking those named after one of `characters`
    pub fn new(roles: &[Role], characters: &[String]) -> Self {
        let roster: HashSet<String> = characters.iter().map(|c| c.to_lowercase()).collect();
        let mut index = RoleIndex::default();

        for role in roles {
            if role.is_everyone {
                index.everyone = Some(role.id);
                continue;
            }
            let name = role.name.to_lowercase();
            if roster.contains(&name) {
                index.characters.push(role.id);
                index.character_set.insert(role.id);
            }
            index.by_name.entry(name).or_default().push(role.id);
        }

        index
    }

    pub fn everyone(&self) -> Option<RoleId> {
        self.everyone
    }

    /// Roles whose name equals `name`, ignoring case
    pub fn by_name(&self, name: &str) -> &[RoleId] {
        self.by_name
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every character role in the workspace
    pub fn characters(&self) -> &[RoleId] {
        &self.characters
    }

    pub fn is_character(&self, role: RoleId) -> bool {
        self.character_set.contains(&role)
    }
}
