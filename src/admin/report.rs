//! Operation reports
//!
//! What each admin operation did, including partial failures.

use crate::bulk::OutcomeReport;
use crate::directory::{ChannelId, UserId};
use crate::error::{AdminError, ClassificationAmbiguity};
use crate::permissions::Category;
use serde::Serialize;
use std::collections::BTreeMap;

/// Messages deleted from one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelPurge {
    pub name: String,
    pub deleted: usize,
}

/// Result of purging messages
#[derive(Debug, Clone, Default, Serialize)]
pub struct PurgeReport {
    /// Purged channels; names may repeat across ids
    pub deleted: BTreeMap<ChannelId, ChannelPurge>,
    /// Requested channel names that do not exist
    pub unknown_targets: Vec<String>,
    pub outcome: OutcomeReport,
}

impl PurgeReport {
    pub fn total_deleted(&self) -> usize {
        self.deleted.values().map(|c| c.deleted).sum()
    }

    /// Messages deleted from `channel`, if it was purged
    pub fn deleted_in(&self, channel: ChannelId) -> Option<usize> {
        self.deleted.get(&channel).map(|c| c.deleted)
    }
}

/// Result of resetting channel permissions
#[derive(Debug, Clone, Default, Serialize)]
pub struct PermissionReport {
    /// Channels handled per category
    pub channels: BTreeMap<Category, usize>,
    /// Names that matched the vocabulary but could not be parsed
    pub ambiguous: Vec<ClassificationAmbiguity>,
    pub outcome: OutcomeReport,
}

/// The workspace owner held a character role; their nickname was left alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerNotice {
    pub member: UserId,
    pub display_name: String,
}

impl OwnerNotice {
    pub fn message(&self) -> String {
        format!(
            "{} owns the server and keeps their nickname; change it manually",
            self.display_name
        )
    }
}

/// Result of stripping character roles
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleReport {
    /// Members that held at least one character role
    pub players: usize,
    pub removals: OutcomeReport,
    pub nickname_resets: OutcomeReport,
    pub owner_notices: Vec<OwnerNotice>,
}

/// Result of a full reset
///
/// Each part is present even when another failed outright.
#[derive(Debug, Serialize)]
pub struct ResetReport {
    #[serde(serialize_with = "serialize_part")]
    pub purge: Result<PurgeReport, AdminError>,
    #[serde(serialize_with = "serialize_part")]
    pub permissions: Result<PermissionReport, AdminError>,
    #[serde(serialize_with = "serialize_part")]
    pub roles: Result<RoleReport, AdminError>,
}

impl ResetReport {
    /// Every part ran and every remote call succeeded
    pub fn is_clean(&self) -> bool {
        matches!(&self.purge, Ok(r) if r.outcome.is_clean())
            && matches!(&self.permissions, Ok(r) if r.outcome.is_clean())
            && matches!(&self.roles, Ok(r) if r.removals.is_clean() && r.nickname_resets.is_clean())
    }

    /// Remote call failures across all parts that ran
    pub fn failed_calls(&self) -> usize {
        let purge = self.purge.as_ref().map(|r| r.outcome.failed()).unwrap_or(0);
        let perms = self
            .permissions
            .as_ref()
            .map(|r| r.outcome.failed())
            .unwrap_or(0);
        let roles = self
            .roles
            .as_ref()
            .map(|r| r.removals.failed() + r.nickname_resets.failed())
            .unwrap_or(0);
        purge + perms + roles
    }
}

fn serialize_part<T, S>(part: &Result<T, AdminError>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: serde::Serializer,
{
    #[derive(Serialize)]
    #[serde(rename_all = "snake_case")]
    enum Part<'a, T> {
        Ok(&'a T),
        Error(String),
    }

    match part {
        Ok(report) => Part::Ok(report).serialize(serializer),
        Err(e) => Part::<T>::Error(e.to_string()).serialize(serializer),
    }
}
