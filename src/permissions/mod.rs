//! Permission engine
//!
//! Computes the overlays every game channel must carry.
//!
//! ## Pipeline
//!
//! ```text
//! channel name → classifier → category + players → rule table → grants → reconciler → writes
//! ```
//!
//! ## Rules
//!
//! | Category | everyone | spectator | characters |
//! |---|---|---|---|
//! | clue | view ✗ send ✗ | view ✓ | owner: view ✓ |
//! | shared chat, voicemail | send ✗ | | all: send ✓ |
//! | private | view ✗ send unset | view ✓ send ✗ | both: view ✓ |
//!
//! Unclassified channels are never written to.
//!
//! ## Example Configuration
//!
//! ```toml
//! [vocabulary]
//! clue = ["-clues$"]
//! shared_chat = ["^group-chat$"]
//! voicemail = ["^voicemails$"]
//! private = ["^[a-z]+(-[a-z]+)+$"]
//! characters = ["charlie", "dakota", "evan", "jack", "julia"]
//! spectator_role = "Spectator"
//! ```

pub mod classifier;
pub mod patterns;
pub mod reconciler;
pub mod rules;
pub mod types;

pub use classifier::Classifier;
pub use patterns::PatternMatcher;
pub use reconciler::reconcile;
pub use rules::{resolve, rules_for};
pub use types::{
    Category, Classification, GrantTemplate, MutationCall, PermissionGrant, RoleIndex, Subject,
};
