//! Game session state
//!
//! A [`GameSession`] is an immutable value. Resetting the game builds a fresh
//! one and swaps it into the [`SessionStore`] in a single step, so readers
//! see either the old session or the new one, never a mix.

use crate::directory::{Role, RoleId, UserId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Per-game state: who spectates and which member plays which character
///
/// The admin operations only ever start empty sessions. Assignments are
/// recorded by whatever hands out characters during a game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSession {
    spectator: Option<RoleId>,
    assignments: HashMap<String, UserId>,
}

impl GameSession {
    /// Start an empty session, resolving the spectator role by name
    pub fn new(roles: &[Role], spectator_role: &str) -> Self {
        let spectator = roles
            .iter()
            .find(|r| !r.is_everyone && r.name.eq_ignore_ascii_case(spectator_role))
            .map(|r| r.id);

        if spectator.is_none() {
            warn!(role = spectator_role, "Spectator role not found");
        }

        Self::with_spectator(spectator)
    }

    pub fn with_spectator(spectator: Option<RoleId>) -> Self {
        Self {
            spectator,
            assignments: HashMap::new(),
        }
    }

    /// A copy of this session with `character` played by `member`
    pub fn with_assignment(&self, character: impl Into<String>, member: UserId) -> Self {
        let mut next = self.clone();
        next.assignments
            .insert(character.into().to_lowercase(), member);
        next
    }

    pub fn spectator(&self) -> Option<RoleId> {
        self.spectator
    }

    /// The member playing `character`, if assigned
    pub fn player_of(&self, character: &str) -> Option<UserId> {
        self.assignments.get(&character.to_lowercase()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Holder of the current session
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Arc<GameSession>>,
}

impl SessionStore {
    pub fn new(session: GameSession) -> Self {
        Self {
            current: RwLock::new(Arc::new(session)),
        }
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Arc<GameSession> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| {
                warn!("session lock poisoned, recovering");
                poisoned.into_inner()
            })
            .clone()
    }

    /// Install `session`, returning the one it replaced
    pub fn replace(&self, session: GameSession) -> Arc<GameSession> {
        let mut guard = self.current.write().unwrap_or_else(|poisoned| {
            warn!("session lock poisoned, recovering");
            poisoned.into_inner()
        });
        std::mem::replace(&mut *guard, Arc::new(session))
    }

    /// Replace the current session with an empty one
    pub fn reinitialize(&self, roles: &[Role], spectator_role: &str) -> Arc<GameSession> {
        let fresh = GameSession::new(roles, spectator_role);
        self.replace(fresh);
        debug!("Game session reinitialized");
        self.current()
    }
}
