//! Discord API payload types
//!
//! Only the fields the admin operations read or write. Ids travel as
//! strings on the wire.

use crate::directory::{
    Channel, ChannelId, ChannelKind, Member, Overwrite, PermValue, Role, RoleId, UserId,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// `VIEW_CHANNEL` permission bit
pub const VIEW_CHANNEL: u64 = 1 << 10;
/// `SEND_MESSAGES` permission bit
pub const SEND_MESSAGES: u64 = 1 << 11;

/// Overwrite target type for roles
pub const OVERWRITE_ROLE: u8 = 0;

/// Milliseconds between the Unix epoch and the Discord epoch (2015-01-01)
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Bulk delete only accepts messages younger than this
pub const BULK_DELETE_MAX_AGE: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// String-encoded snowflake ids
pub(crate) mod snowflake {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(D::Error::custom)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, de::Error};

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<u64>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|s| s.parse().map_err(D::Error::custom))
                .transpose()
        }
    }

    pub mod list {
        use serde::{Deserialize, Deserializer, de::Error};

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<u64>, D::Error> {
            Vec::<String>::deserialize(deserializer)?
                .into_iter()
                .map(|s| s.parse().map_err(D::Error::custom))
                .collect()
        }
    }
}

/// Guild (workspace)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGuild {
    #[serde(with = "snowflake")]
    pub id: u64,
    pub name: String,
    #[serde(with = "snowflake")]
    pub owner_id: u64,
}

/// Guild channel
#[derive(Debug, Clone, Deserialize)]
pub struct ApiChannel {
    #[serde(with = "snowflake")]
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "snowflake::option::deserialize")]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub permission_overwrites: Vec<ApiOverwrite>,
}

impl ApiChannel {
    pub fn kind(&self) -> ChannelKind {
        match self.kind {
            // GUILD_TEXT, GUILD_ANNOUNCEMENT
            0 | 5 => ChannelKind::Text,
            2 | 13 => ChannelKind::Voice,
            4 => ChannelKind::Category,
            _ => ChannelKind::Other,
        }
    }

    pub fn into_channel(self) -> Channel {
        Channel {
            id: ChannelId(self.id),
            kind: self.kind(),
            name: self.name.unwrap_or_default(),
            parent: self.parent_id.map(ChannelId),
        }
    }
}

/// Permission overwrite as stored on a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiOverwrite {
    #[serde(with = "snowflake")]
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: u8,
    pub allow: String,
    pub deny: String,
}

/// Body of `PUT /channels/{channel}/permissions/{overwrite}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOverwrite {
    #[serde(rename = "type")]
    pub kind: u8,
    pub allow: String,
    pub deny: String,
}

impl From<Overwrite> for EditOverwrite {
    fn from(overwrite: Overwrite) -> Self {
        let mut allow = 0u64;
        let mut deny = 0u64;

        for (value, bit) in [(overwrite.view, VIEW_CHANNEL), (overwrite.send, SEND_MESSAGES)] {
            match value {
                PermValue::Allow => allow |= bit,
                PermValue::Deny => deny |= bit,
                PermValue::Inherit => {}
            }
        }

        Self {
            kind: OVERWRITE_ROLE,
            allow: allow.to_string(),
            deny: deny.to_string(),
        }
    }
}

/// Guild role
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRole {
    #[serde(with = "snowflake")]
    pub id: u64,
    pub name: String,
}

impl ApiRole {
    /// The everyone role shares the guild's id
    pub fn into_role(self, guild_id: u64) -> Role {
        Role {
            id: RoleId(self.id),
            is_everyone: self.id == guild_id,
            name: self.name,
        }
    }
}

/// User account
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    #[serde(with = "snowflake")]
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

/// Guild member
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMember {
    pub user: ApiUser,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(deserialize_with = "snowflake::list::deserialize")]
    pub roles: Vec<u64>,
}

impl ApiMember {
    pub fn into_member(self, owner_id: u64) -> Member {
        let display_name = self
            .nick
            .or(self.user.global_name)
            .unwrap_or(self.user.username);

        Member {
            id: UserId(self.user.id),
            is_bot: self.user.bot,
            is_owner: self.user.id == owner_id,
            roles: self.roles.into_iter().map(RoleId).collect(),
            display_name,
        }
    }
}

/// Channel message (id only)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(with = "snowflake")]
    pub id: u64,
}

impl ApiMessage {
    /// Creation time encoded in the id
    pub fn created_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis((self.id >> 22) + DISCORD_EPOCH_MS)
    }

    /// Whether bulk delete still accepts this message
    pub fn is_bulk_deletable(&self, now: SystemTime) -> bool {
        now.duration_since(self.created_at())
            .map(|age| age < BULK_DELETE_MAX_AGE)
            .unwrap_or(true)
    }
}

/// Body of `POST /channels/{channel}/messages/bulk-delete`
#[derive(Debug, Clone, Serialize)]
pub struct BulkDelete {
    pub messages: Vec<String>,
}

/// Body of `PATCH /channels/{channel}`
#[derive(Debug, Clone, Serialize)]
pub struct EditChannelOverwrites {
    pub permission_overwrites: Vec<ApiOverwrite>,
}

/// Body of `PATCH /guilds/{guild}/members/{user}`
#[derive(Debug, Clone, Serialize)]
pub struct EditNickname {
    pub nick: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_edit_overwrite_bits() {
        let body = EditOverwrite::from(Overwrite::new(PermValue::Deny, PermValue::Deny));
        assert_eq!(body.allow, "0");
        assert_eq!(body.deny, (VIEW_CHANNEL | SEND_MESSAGES).to_string());

        let body = EditOverwrite::from(Overwrite::new(PermValue::Allow, PermValue::Inherit));
        assert_eq!(body.allow, "1024");
        assert_eq!(body.deny, "0");
    }

    #[test]
    fn test_member_display_name_prefers_nick() {
        let member: ApiMember = serde_json::from_value(json!({
            "user": {"id": "5", "username": "alice_irl", "global_name": "Alice R."},
            "nick": "Alice",
            "roles": ["10", "11"]
        }))
        .unwrap();

        let member = member.into_member(5);
        assert_eq!(member.display_name, "Alice");
        assert!(member.is_owner);
        assert!(!member.is_bot);
        assert_eq!(member.roles, vec![RoleId(10), RoleId(11)]);
    }

    #[test]
    fn test_channel_kinds() {
        let channel: ApiChannel = serde_json::from_value(json!({
            "id": "7", "type": 0, "name": "group-chat", "parent_id": "3"
        }))
        .unwrap();
        let channel = channel.into_channel();
        assert_eq!(channel.kind, ChannelKind::Text);
        assert_eq!(channel.parent, Some(ChannelId(3)));

        let category: ApiChannel =
            serde_json::from_value(json!({"id": "3", "type": 4, "name": "Game"})).unwrap();
        assert_eq!(category.kind(), ChannelKind::Category);
    }

    #[test]
    fn test_message_age() {
        let now = SystemTime::now();
        let ms = now.duration_since(UNIX_EPOCH).unwrap().as_millis() as u64;
        let fresh = ApiMessage {
            id: (ms - DISCORD_EPOCH_MS) << 22,
        };
        assert!(fresh.is_bulk_deletable(now));

        let old = ApiMessage {
            id: (ms - DISCORD_EPOCH_MS - 15 * 24 * 60 * 60 * 1000) << 22,
        };
        assert!(!old.is_bulk_deletable(now));
    }
}
