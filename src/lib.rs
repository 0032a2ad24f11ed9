//! Mystery Admin
//!
//! Between-session reset tooling for a murder mystery game hosted in a
//! Discord server.
//!
//! ## Features
//!
//! - **Channel classification** driven by a configurable naming vocabulary
//! - **Declarative permission reset**: every game channel's overlays are rewritten from a rule table
//! - **Concurrent bulk dispatch** of remote calls with per-call failure reporting
//! - **Composite reset** of messages, permissions and character roles
//!
//! ## Reset Model
//!
//! ```text
//! reset = wipe ∥ reset_permissions ∥ reset_roles
//! ```
//!
//! The three parts run concurrently and all run to completion. A failed
//! remote call is counted, never retried by the engine, and never stops the
//! calls around it.
//!
//! ## Example Configuration
//!
//! ```toml
//! [discord]
//! guild_id = 123456789012345678
//! # token from DISCORD_TOKEN env var
//!
//! [vocabulary]
//! clue = ["-clues$"]
//! characters = ["charlie", "dakota", "evan", "jack", "julia"]
//! spectator_role = "Spectator"
//! ```

pub mod admin;
pub mod bulk;
pub mod config;
pub mod directory;
pub mod discord;
pub mod error;
pub mod permissions;
pub mod session;
pub mod util;

// Re-export main types
pub use admin::Admin;
pub use config::{AppConfig, load_config};
pub use directory::{Directory, SharedDirectory};
pub use error::{AppError, Result};
