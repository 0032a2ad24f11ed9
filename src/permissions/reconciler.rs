//! Permission reconciler
//!
//! Turns the grants computed for a channel into overlay writes. Nothing is
//! read back first: each write replaces the role's overlay outright, so the
//! desired state is reached no matter what was there before.

use crate::directory::{Channel, Overwrite, RoleId};
use crate::permissions::types::{MutationCall, PermissionGrant};
use std::collections::BTreeMap;

/// Compute the writes that bring `channel` to `grants`
///
/// Grants for the same role are merged into a single write. Calls come out
/// ordered by role id.
pub fn reconcile(channel: &Channel, grants: &[PermissionGrant]) -> Vec<MutationCall> {
    let mut per_role: BTreeMap<RoleId, Overwrite> = BTreeMap::new();

    for grant in grants {
        per_role
            .entry(grant.role)
            .and_modify(|current| *current = current.merge(grant.overwrite))
            .or_insert(grant.overwrite);
    }

    per_role
        .into_iter()
        .map(|(role, overwrite)| MutationCall {
            channel: channel.id,
            channel_name: channel.name.clone(),
            role,
            overwrite,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::PermValue::{Allow, Deny};

    #[test]
    fn test_one_call_per_role() {
        let channel = Channel::text(5, "alice-bob");
        let grants = vec![
            PermissionGrant {
                role: RoleId(20),
                overwrite: Overwrite::view(Allow),
            },
            PermissionGrant {
                role: RoleId(3),
                overwrite: Overwrite::new(Deny, Deny),
            },
        ];

        let calls = reconcile(&channel, &grants);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].role, RoleId(3));
        assert_eq!(calls[1].role, RoleId(20));
        assert!(calls.iter().all(|c| c.channel == channel.id));
    }

    #[test]
    fn test_same_role_grants_merge() {
        let channel = Channel::text(5, "alice-diary");
        let grants = vec![
            PermissionGrant {
                role: RoleId(7),
                overwrite: Overwrite::view(Allow),
            },
            PermissionGrant {
                role: RoleId(7),
                overwrite: Overwrite::send(Deny),
            },
        ];

        let calls = reconcile(&channel, &grants);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].overwrite, Overwrite::new(Allow, Deny));
    }

    #[test]
    fn test_no_grants_no_calls() {
        assert!(reconcile(&Channel::text(1, "general"), &[]).is_empty());
    }
}
