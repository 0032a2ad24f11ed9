//! Configuration types for mystery-admin
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::util::SecretString;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Chat platform connection settings
    pub discord: DiscordConfig,

    /// Channel naming vocabulary and game roster
    pub vocabulary: VocabularyConfig,

    /// Bulk dispatch limits
    pub bulk: BulkConfig,

    /// Message purge settings
    pub purge: PurgeConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Chat platform connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// REST API base URL, including the version segment
    pub url: String,

    /// Bot token (prefer env var DISCORD_TOKEN)
    pub token: Option<SecretString>,

    /// Workspace (guild) the game runs in
    pub guild_id: Option<u64>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retries for rate limited or transient failures
    pub max_retries: u32,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            url: "https://discord.com/api/v10".to_string(),
            token: None,
            guild_id: None,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl DiscordConfig {
    /// Get the API base URL without a trailing slash
    pub fn api_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Channel naming vocabulary
///
/// Each list holds regex patterns matched against channel names. Categories
/// are checked in the order shared chat, voicemail, clue, private, so a
/// shared chat name that also looks like `a-b` is never a private channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Clue channels, named `<player>-<topic>`
    pub clue: Vec<String>,

    /// The channel every character may post in
    pub shared_chat: Vec<String>,

    /// Voicemail channels
    pub voicemail: Vec<String>,

    /// Two-player text channels, named `<playerA>-<playerB>`
    pub private: Vec<String>,

    /// Character names (matched case-insensitively against role names)
    pub characters: Vec<String>,

    /// Name of the spectator role
    pub spectator_role: String,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            clue: vec!["-clues$".to_string()],
            shared_chat: vec!["^group-chat$".to_string()],
            voicemail: vec!["^voicemails?$".to_string()],
            private: vec!["^[a-z]+(-[a-z]+)+$".to_string()],
            characters: ["charlie", "dakota", "evan", "jack", "julia"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            spectator_role: "Spectator".to_string(),
        }
    }
}

/// Bulk dispatch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BulkConfig {
    /// Maximum number of remote calls in flight at once
    pub max_in_flight: usize,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self { max_in_flight: 50 }
    }
}

/// Message purge configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PurgeConfig {
    /// Maximum messages deleted per channel; unset deletes everything
    pub limit: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
