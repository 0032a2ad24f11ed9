//! Shared test fixtures: an in-memory directory with failure injection

#![allow(dead_code)]

use async_trait::async_trait;
use mystery_admin::config::{AppConfig, VocabularyConfig};
use mystery_admin::directory::{
    Channel, ChannelId, Directory, Member, Overwrite, Role, RoleId, UserId,
};
use mystery_admin::error::{DirectoryError, DirectoryResult};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const GUILD: u64 = 1;

pub const ALICE: RoleId = RoleId(10);
pub const BOB: RoleId = RoleId(11);
pub const CAROL: RoleId = RoleId(12);
pub const SPECTATOR: RoleId = RoleId(20);
pub const MODERATOR: RoleId = RoleId(30);
pub const EVERYONE: RoleId = RoleId(GUILD);

pub const ALICE_DIARY: ChannelId = ChannelId(100);
pub const BOB_DIARY: ChannelId = ChannelId(101);
pub const GROUP_CHAT: ChannelId = ChannelId(102);
pub const VOICEMAILS: ChannelId = ChannelId(103);
pub const ALICE_BOB: ChannelId = ChannelId(104);
pub const GENERAL: ChannelId = ChannelId(105);
pub const BOB_CAROL: ChannelId = ChannelId(106);

pub const HOST: UserId = UserId(1000);
pub const BEA: UserId = UserId(1001);
pub const CY: UserId = UserId(1002);
pub const HELPER_BOT: UserId = UserId(1003);

/// In-memory workspace recording every mutation
#[derive(Default)]
pub struct FakeDirectory {
    channels: Vec<Channel>,
    roles: Vec<Role>,
    members: Mutex<Vec<Member>>,
    messages: Mutex<HashMap<ChannelId, usize>>,

    pub overwrites: Mutex<HashMap<(ChannelId, RoleId), Overwrite>>,
    pub nicknames: Mutex<HashMap<UserId, Option<String>>>,
    pub synced: Mutex<Vec<ChannelId>>,
    pub writes: AtomicUsize,

    failing_writes: HashSet<ChannelId>,
    failing_purges: HashSet<ChannelId>,
    failing_removals: HashSet<UserId>,
    fail_channel_listing: bool,
    delay: Option<Duration>,
}

impl FakeDirectory {
    pub fn new(channels: Vec<Channel>, roles: Vec<Role>, members: Vec<Member>) -> Self {
        Self {
            channels,
            roles,
            members: Mutex::new(members),
            ..Default::default()
        }
    }

    /// The standard game server used across tests
    pub fn game() -> Self {
        Self::new(game_channels(), game_roles(), game_members())
    }

    pub fn fail_writes_on(mut self, channel: ChannelId) -> Self {
        self.failing_writes.insert(channel);
        self
    }

    pub fn fail_purge_on(mut self, channel: ChannelId) -> Self {
        self.failing_purges.insert(channel);
        self
    }

    pub fn fail_removals_for(mut self, member: UserId) -> Self {
        self.failing_removals.insert(member);
        self
    }

    pub fn fail_channel_listing(mut self) -> Self {
        self.fail_channel_listing = true;
        self
    }

    pub fn with_messages(self, channel: ChannelId, count: usize) -> Self {
        self.messages.lock().unwrap().insert(channel, count);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn overwrite(&self, channel: ChannelId, role: RoleId) -> Option<Overwrite> {
        self.overwrites.lock().unwrap().get(&(channel, role)).copied()
    }

    /// Roles with an overlay on `channel`, sorted
    pub fn roles_on(&self, channel: ChannelId) -> Vec<RoleId> {
        let mut roles: Vec<RoleId> = self
            .overwrites
            .lock()
            .unwrap()
            .keys()
            .filter(|(c, _)| *c == channel)
            .map(|(_, r)| *r)
            .collect();
        roles.sort();
        roles
    }

    pub fn member_roles(&self, member: UserId) -> Vec<RoleId> {
        self.members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == member)
            .map(|m| m.roles.clone())
            .unwrap_or_default()
    }

    pub fn messages_left(&self, channel: ChannelId) -> usize {
        self.messages
            .lock()
            .unwrap()
            .get(&channel)
            .copied()
            .unwrap_or(0)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Directory for FakeDirectory {
    async fn list_text_channels(&self) -> DirectoryResult<Vec<Channel>> {
        if self.fail_channel_listing {
            return Err(DirectoryError::Unavailable("channels offline".to_string()));
        }
        Ok(self.channels.clone())
    }

    async fn list_roles(&self) -> DirectoryResult<Vec<Role>> {
        Ok(self.roles.clone())
    }

    async fn list_members(&self) -> DirectoryResult<Vec<Member>> {
        Ok(self.members.lock().unwrap().clone())
    }

    async fn set_overwrite(
        &self,
        channel: ChannelId,
        role: RoleId,
        overwrite: Overwrite,
    ) -> DirectoryResult<()> {
        self.pause().await;
        if self.failing_writes.contains(&channel) {
            return Err(DirectoryError::Forbidden {
                action: format!("edit channel {}", channel),
            });
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.overwrites
            .lock()
            .unwrap()
            .insert((channel, role), overwrite);
        Ok(())
    }

    async fn sync_permissions(&self, channel: ChannelId) -> DirectoryResult<()> {
        self.pause().await;
        self.overwrites
            .lock()
            .unwrap()
            .retain(|(c, _), _| *c != channel);
        self.synced.lock().unwrap().push(channel);
        Ok(())
    }

    async fn purge_messages(
        &self,
        channel: ChannelId,
        limit: Option<usize>,
    ) -> DirectoryResult<usize> {
        self.pause().await;
        if self.failing_purges.contains(&channel) {
            return Err(DirectoryError::Api {
                status: 500,
                message: "purge failed".to_string(),
            });
        }
        let mut messages = self.messages.lock().unwrap();
        let left = messages.entry(channel).or_insert(0);
        let deleted = limit.map_or(*left, |l| l.min(*left));
        *left -= deleted;
        Ok(deleted)
    }

    async fn remove_role(&self, member: UserId, role: RoleId) -> DirectoryResult<()> {
        self.pause().await;
        if self.failing_removals.contains(&member) {
            return Err(DirectoryError::Forbidden {
                action: "manage roles".to_string(),
            });
        }
        let mut members = self.members.lock().unwrap();
        let member = members
            .iter_mut()
            .find(|m| m.id == member)
            .ok_or_else(|| DirectoryError::NotFound {
                resource: "member".to_string(),
            })?;
        member.roles.retain(|r| *r != role);
        Ok(())
    }

    async fn set_nickname(&self, member: UserId, nickname: Option<String>) -> DirectoryResult<()> {
        self.pause().await;
        self.nicknames.lock().unwrap().insert(member, nickname);
        Ok(())
    }
}

pub fn game_channels() -> Vec<Channel> {
    vec![
        Channel::text(ALICE_DIARY.0, "alice-diary"),
        Channel::text(BOB_DIARY.0, "bob-diary"),
        Channel::text(GROUP_CHAT.0, "group-chat"),
        Channel::text(VOICEMAILS.0, "voicemails"),
        Channel::text(ALICE_BOB.0, "alice-bob"),
        Channel::text(GENERAL.0, "general"),
        Channel::text(BOB_CAROL.0, "bob-carol"),
    ]
}

pub fn game_roles() -> Vec<Role> {
    vec![
        Role::everyone(GUILD),
        Role::new(ALICE.0, "Alice"),
        Role::new(BOB.0, "Bob"),
        Role::new(CAROL.0, "Carol"),
        Role::new(SPECTATOR.0, "Spectator"),
        Role::new(MODERATOR.0, "Moderator"),
    ]
}

pub fn game_members() -> Vec<Member> {
    vec![
        Member {
            id: HOST,
            display_name: "Host".to_string(),
            is_bot: false,
            is_owner: true,
            roles: vec![ALICE],
        },
        Member {
            id: BEA,
            display_name: "Bea".to_string(),
            is_bot: false,
            is_owner: false,
            roles: vec![BOB, MODERATOR],
        },
        Member {
            id: CY,
            display_name: "Cy".to_string(),
            is_bot: false,
            is_owner: false,
            roles: vec![MODERATOR],
        },
        Member {
            id: HELPER_BOT,
            display_name: "Helper".to_string(),
            is_bot: true,
            is_owner: false,
            roles: vec![CAROL],
        },
    ]
}

pub fn game_vocabulary() -> VocabularyConfig {
    VocabularyConfig {
        clue: vec!["-diary$".to_string()],
        shared_chat: vec!["^group-chat$".to_string()],
        voicemail: vec!["^voicemails$".to_string()],
        private: vec!["^[a-z]+(-[a-z]+)+$".to_string()],
        characters: vec!["alice".to_string(), "bob".to_string(), "carol".to_string()],
        spectator_role: "Spectator".to_string(),
    }
}

pub fn game_config() -> AppConfig {
    AppConfig {
        vocabulary: game_vocabulary(),
        ..Default::default()
    }
}
