//! Discord API module
//!
//! Provides the REST client that backs [`crate::directory::Directory`] in
//! production.

pub mod client;
pub mod types;

pub use client::DiscordClient;
