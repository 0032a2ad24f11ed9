//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. `DISCORD_TOKEN` / `DISCORD_GUILD_ID`
//! 2. Environment variables (MYSTERY_ADMIN__*)
//! 3. Configuration file (TOML)
//! 4. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "mystery-admin.toml",
    ".mystery-admin.toml",
    "~/.config/mystery-admin/config.toml",
    "/etc/mystery-admin/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    // Token and guild are not needed to exercise the engine
    validate_config_relaxed(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g. MYSTERY_ADMIN__BULK__MAX_IN_FLIGHT maps to bulk.max_in_flight
    builder = builder.add_source(
        Environment::with_prefix("MYSTERY_ADMIN")
            .separator("__")
            .try_parsing(true),
    );

    if let Ok(token) = std::env::var("DISCORD_TOKEN") {
        builder = builder
            .set_override("discord.token", token)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    if let Ok(guild) = std::env::var("DISCORD_GUILD_ID") {
        let guild: u64 = guild.trim().parse().map_err(|_| ConfigError::Invalid {
            message: format!("DISCORD_GUILD_ID must be a numeric id, got: {}", guild),
        })?;
        builder = builder
            .set_override("discord.guild_id", guild)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values (relaxed - no credentials required)
fn validate_config_relaxed(config: &AppConfig) -> Result<(), ConfigError> {
    if config.discord.url.is_empty() {
        return Err(ConfigError::Missing {
            field: "discord.url".to_string(),
        });
    }

    if !config.discord.url.starts_with("http://") && !config.discord.url.starts_with("https://") {
        return Err(ConfigError::Invalid {
            message: format!(
                "discord.url must start with http:// or https://, got: {}",
                config.discord.url
            ),
        });
    }

    if config.discord.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "discord.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.bulk.max_in_flight == 0 {
        return Err(ConfigError::Invalid {
            message: "bulk.max_in_flight must be greater than 0".to_string(),
        });
    }

    if config.vocabulary.spectator_role.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "vocabulary.spectator_role".to_string(),
        });
    }

    validate_all_patterns(config)?;

    Ok(())
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_config_relaxed(config)?;

    if config.discord.token.as_ref().is_none_or(|t| t.is_empty()) {
        return Err(ConfigError::Missing {
            field: "discord.token (set DISCORD_TOKEN environment variable)".to_string(),
        });
    }

    if config.discord.guild_id.is_none() {
        return Err(ConfigError::Missing {
            field: "discord.guild_id (set DISCORD_GUILD_ID environment variable)".to_string(),
        });
    }

    Ok(())
}

/// Validate all regex patterns in the vocabulary
fn validate_all_patterns(config: &AppConfig) -> Result<(), ConfigError> {
    let vocabulary = &config.vocabulary;
    validate_patterns(&vocabulary.clue, "vocabulary.clue")?;
    validate_patterns(&vocabulary.shared_chat, "vocabulary.shared_chat")?;
    validate_patterns(&vocabulary.voicemail, "vocabulary.voicemail")?;
    validate_patterns(&vocabulary.private, "vocabulary.private")?;
    Ok(())
}

/// Validate that all patterns are valid regex
fn validate_patterns(patterns: &[String], field_path: &str) -> Result<(), ConfigError> {
    for pattern in patterns {
        if let Err(e) = regex::Regex::new(pattern) {
            return Err(ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                reason: format!("in {}: {}", field_path, e),
            });
        }
    }
    Ok(())
}
