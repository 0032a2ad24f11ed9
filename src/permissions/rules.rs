//! Permission rule table
//!
//! The single source of truth for what each channel category's overlays
//! look like. Templates name subjects abstractly; [`resolve`] turns them
//! into grants on concrete roles.

use crate::directory::{Overwrite, PermValue};
use crate::permissions::types::{
    Classification, GrantTemplate, PermissionGrant, RoleIndex, Subject,
};
use crate::session::GameSession;
use tracing::warn;

use PermValue::{Allow, Deny, Inherit};

/// Grant templates for a classified channel
pub fn rules_for(classification: &Classification) -> Vec<GrantTemplate> {
    match classification {
        Classification::Clue { owner } => vec![
            GrantTemplate::new(Subject::Everyone, Overwrite::new(Deny, Deny)),
            GrantTemplate::new(Subject::Spectator, Overwrite::view(Allow)),
            GrantTemplate::new(Subject::Character(owner.clone()), Overwrite::view(Allow)),
        ],
        Classification::SharedChat | Classification::Voicemail => vec![
            GrantTemplate::new(Subject::Everyone, Overwrite::send(Deny)),
            GrantTemplate::new(Subject::AllCharacters, Overwrite::send(Allow)),
        ],
        Classification::Private { players: [a, b] } => vec![
            GrantTemplate::new(Subject::Everyone, Overwrite::new(Deny, Inherit)),
            GrantTemplate::new(Subject::Spectator, Overwrite::new(Allow, Deny)),
            GrantTemplate::new(Subject::Character(a.clone()), Overwrite::view(Allow)),
            GrantTemplate::new(Subject::Character(b.clone()), Overwrite::view(Allow)),
        ],
        Classification::Unclassified => Vec::new(),
    }
}

/// Resolve templates against the workspace's roles
///
/// Subjects with no matching role are skipped.
pub fn resolve(
    templates: &[GrantTemplate],
    roles: &RoleIndex,
    session: &GameSession,
) -> Vec<PermissionGrant> {
    let mut grants = Vec::with_capacity(templates.len());

    for template in templates {
        let resolved: Vec<_> = match &template.subject {
            Subject::Everyone => roles.everyone().into_iter().collect(),
            Subject::Spectator => session.spectator().into_iter().collect(),
            Subject::Character(name) => roles.by_name(name).to_vec(),
            Subject::AllCharacters => roles.characters().to_vec(),
        };

        if resolved.is_empty() && !matches!(template.subject, Subject::AllCharacters) {
            warn!(subject = ?template.subject, "No role found for grant subject");
        }

        grants.extend(resolved.into_iter().map(|role| PermissionGrant {
            role,
            overwrite: template.overwrite,
        }));
    }

    grants
}
