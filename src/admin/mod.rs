//! Admin operations
//!
//! The operations a game host runs between sessions:
//!
//! - `reveal_all` - drop per-channel overlays so every channel follows its category
//! - `wipe` - delete messages and start a fresh game session
//! - `reset_permissions` - rewrite every game channel's overlays
//! - `reset_roles` - take character roles back and clear nicknames
//! - `reset` - wipe, permission reset and role reset together
//!
//! Checking that the caller may run these is left to whoever exposes them.
//! Individual remote failures never abort an operation; they are counted in
//! its report. Only failing to list the workspace's contents is fatal.

pub mod report;

pub use report::{
    ChannelPurge, OwnerNotice, PermissionReport, PurgeReport, ResetReport, RoleReport,
};

use crate::bulk::{BatchHandle, BulkOrchestrator};
use crate::config::AppConfig;
use crate::directory::{Channel, Role, RoleId, SharedDirectory, UserId};
use crate::error::{AdminError, AdminResult, ConfigError};
use crate::permissions::{Classifier, MutationCall, RoleIndex, reconcile, resolve, rules_for};
use crate::session::{GameSession, SessionStore};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Runs admin operations against one workspace
pub struct Admin {
    directory: SharedDirectory,
    classifier: Classifier,
    characters: Vec<String>,
    spectator_role: String,
    purge_limit: Option<usize>,
    bulk: BulkOrchestrator,
    session: SessionStore,
}

impl Admin {
    /// Create a new admin from configuration
    pub fn new(directory: SharedDirectory, config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            directory,
            classifier: Classifier::new(&config.vocabulary)?,
            characters: config.vocabulary.characters.clone(),
            spectator_role: config.vocabulary.spectator_role.clone(),
            purge_limit: config.purge.limit,
            bulk: BulkOrchestrator::new(config.bulk.max_in_flight),
            session: SessionStore::default(),
        })
    }

    /// The current game session
    pub fn session(&self) -> Arc<GameSession> {
        self.session.current()
    }

    /// Sync every text channel's overlays with its category
    ///
    /// Returns as soon as the calls are dispatched. Join the handle to wait
    /// for them, or drop it to let them finish in the background.
    #[instrument(skip(self))]
    pub async fn reveal_all(&self) -> AdminResult<BatchHandle<()>> {
        let channels = self.text_channels().await?;
        info!(channels = channels.len(), "Revealing all channels");

        Ok(self.bulk.dispatch(channels.into_iter().map(|channel| {
            let directory = self.directory.clone();
            let id = channel.id;
            (format!("#{}", channel.name), async move {
                directory.sync_permissions(id).await
            })
        })))
    }

    /// Delete messages and reinitialize the game session
    ///
    /// `targets` names the channels to purge; all text channels when `None`.
    #[instrument(skip(self))]
    pub async fn wipe(&self, targets: Option<&[String]>) -> AdminResult<PurgeReport> {
        let channels = self.text_channels().await?;
        let roles = self.roles().await?;

        let mut report = PurgeReport::default();
        let selected: Vec<Channel> = match targets {
            None => channels,
            Some(names) => {
                let mut seen = HashSet::new();
                let mut selected = Vec::new();
                for name in names {
                    let key = name.trim_start_matches('#').to_lowercase();
                    let matching: Vec<&Channel> = channels
                        .iter()
                        .filter(|c| c.name.to_lowercase() == key)
                        .collect();
                    if matching.is_empty() {
                        warn!(channel = %name, "Wipe target not found");
                        report.unknown_targets.push(name.clone());
                    }
                    // Several channels may share a name; all of them are purged once
                    selected.extend(
                        matching
                            .into_iter()
                            .filter(|c| seen.insert(c.id))
                            .cloned(),
                    );
                }
                selected
            }
        };

        info!(channels = selected.len(), "Wiping messages");
        let limit = self.purge_limit;
        let batch = self.bulk.dispatch(selected.into_iter().map(|channel| {
            let directory = self.directory.clone();
            let id = channel.id;
            (channel.name, async move {
                directory.purge_messages(id, limit).await.map(|n| (id, n))
            })
        }));

        self.session.reinitialize(&roles, &self.spectator_role);

        let (deleted, outcome) = batch.join_values().await;
        report.deleted = deleted
            .into_iter()
            .map(|(name, (id, deleted))| (id, ChannelPurge { name, deleted }))
            .collect();
        report.outcome = outcome;

        info!(
            deleted = report.total_deleted(),
            failures = report.outcome.failed(),
            "Wipe finished"
        );
        Ok(report)
    }

    /// Rewrite the overlays of every game channel
    #[instrument(skip(self))]
    pub async fn reset_permissions(&self) -> AdminResult<PermissionReport> {
        let roles = self.roles().await?;
        // Spectator resolution reads the session, so it is replaced first
        let session = self.session.reinitialize(&roles, &self.spectator_role);

        let channels = self.text_channels().await?;
        let index = RoleIndex::new(&roles, &self.characters);
        let (calls, mut report) = self.plan_permissions(&channels, &index, &session);

        info!(
            channels = channels.len(),
            writes = calls.len(),
            "Resetting channel permissions"
        );
        report.outcome = self.bulk.apply_all(&self.directory, calls).join().await;

        info!(
            succeeded = report.outcome.succeeded,
            failures = report.outcome.failed(),
            ambiguous = report.ambiguous.len(),
            "Permission reset finished"
        );
        Ok(report)
    }

    /// Compute the overlay writes for `channels`
    pub fn plan_permissions(
        &self,
        channels: &[Channel],
        roles: &RoleIndex,
        session: &GameSession,
    ) -> (Vec<MutationCall>, PermissionReport) {
        let mut report = PermissionReport::default();
        let mut calls = Vec::new();

        for channel in channels {
            let classification = match self.classifier.try_classify(&channel.name) {
                Ok(classification) => classification,
                Err(ambiguity) => {
                    warn!(channel = %channel.name, reason = %ambiguity.reason, "Skipping ambiguous channel");
                    report.ambiguous.push(ambiguity);
                    continue;
                }
            };

            let category = classification.category();
            *report.channels.entry(category).or_default() += 1;
            if !category.is_managed() {
                continue;
            }

            let grants = resolve(&rules_for(&classification), roles, session);
            let writes = reconcile(channel, &grants);
            debug!(channel = %channel.name, category = %category, writes = writes.len(), "Planned channel");
            calls.extend(writes);
        }

        (calls, report)
    }

    /// Remove character roles from every member and clear player nicknames
    #[instrument(skip(self))]
    pub async fn reset_roles(&self) -> AdminResult<RoleReport> {
        let members = self
            .directory
            .list_members()
            .await
            .map_err(AdminError::listing("members"))?;
        let roles = self.roles().await?;
        let index = RoleIndex::new(&roles, &self.characters);
        let names: HashMap<RoleId, &str> = roles.iter().map(|r| (r.id, r.name.as_str())).collect();

        let mut report = RoleReport::default();
        let mut removals = Vec::new();

        for member in members.iter().filter(|m| !m.is_bot) {
            let held: Vec<RoleId> = member
                .roles
                .iter()
                .copied()
                .filter(|r| index.is_character(*r))
                .collect();
            if held.is_empty() {
                continue;
            }
            report.players += 1;

            for role in held {
                let directory = self.directory.clone();
                let member_id = member.id;
                let target = format!(
                    "{} -{}",
                    member.display_name,
                    names.get(&role).copied().unwrap_or("?")
                );
                removals.push((target, async move {
                    directory.remove_role(member_id, role).await.map(|_| member_id)
                }));
            }
        }

        info!(players = report.players, removals = removals.len(), "Removing character roles");
        let (removed, outcome) = self.bulk.dispatch(removals).join_values().await;
        report.removals = outcome;

        let lost_role: HashSet<UserId> = removed.into_iter().map(|(_, member)| member).collect();
        let mut resets = Vec::new();

        for member in members.iter().filter(|m| lost_role.contains(&m.id)) {
            if member.is_owner {
                let notice = OwnerNotice {
                    member: member.id,
                    display_name: member.display_name.clone(),
                };
                warn!(member = %member.display_name, "{}", notice.message());
                report.owner_notices.push(notice);
                continue;
            }

            let directory = self.directory.clone();
            let member_id = member.id;
            resets.push((member.display_name.clone(), async move {
                directory.set_nickname(member_id, None).await
            }));
        }

        report.nickname_resets = self.bulk.dispatch(resets).join().await;

        info!(
            removed = report.removals.succeeded,
            failures = report.removals.failed() + report.nickname_resets.failed(),
            "Role reset finished"
        );
        Ok(report)
    }

    /// Wipe, reset permissions and reset roles concurrently
    ///
    /// All three run to completion regardless of how the others fare.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> ResetReport {
        info!("Resetting server");

        let (purge, permissions, roles) =
            tokio::join!(self.wipe(None), self.reset_permissions(), self.reset_roles());

        for (part, error) in [
            ("wipe", purge.as_ref().err()),
            ("permissions", permissions.as_ref().err()),
            ("roles", roles.as_ref().err()),
        ] {
            if let Some(e) = error {
                warn!(part, error = %e, "Reset part failed");
            }
        }

        let report = ResetReport {
            purge,
            permissions,
            roles,
        };
        info!(failed_calls = report.failed_calls(), "Reset finished");
        report
    }

    async fn text_channels(&self) -> AdminResult<Vec<Channel>> {
        self.directory
            .list_text_channels()
            .await
            .map_err(AdminError::listing("channels"))
    }

    async fn roles(&self) -> AdminResult<Vec<Role>> {
        self.directory
            .list_roles()
            .await
            .map_err(AdminError::listing("roles"))
    }
}
