//! Discord API client
//!
//! A thin HTTP client for the Discord REST API, implementing [`Directory`]
//! for one guild.

use crate::config::DiscordConfig;
use crate::directory::{Channel, ChannelId, ChannelKind, Directory, Member, Overwrite, Role, RoleId, UserId};
use crate::discord::types::{
    ApiChannel, ApiGuild, ApiMember, ApiMessage, ApiRole, BulkDelete, EditChannelOverwrites,
    EditNickname, EditOverwrite,
};
use crate::error::{ConfigError, DirectoryError, DirectoryResult};
use crate::util::{QueryBuilder, SecretString};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::{Duration, SystemTime};
use tracing::{debug, instrument, warn};

/// Page size for member listing
const MEMBER_PAGE: usize = 1000;
/// Page size for message listing and bulk delete
const MESSAGE_PAGE: usize = 100;

/// First backoff step for transient failures
const BASE_BACKOFF: Duration = Duration::from_millis(100);
/// Upper bound on any single wait between attempts
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Wait before retry number `attempt` (1-based)
///
/// Rate limits wait as long as the server asked; other transient failures
/// back off exponentially. Both are capped at [`MAX_RETRY_DELAY`].
fn retry_delay(error: &DirectoryError, attempt: u32) -> Duration {
    let delay = match error {
        DirectoryError::RateLimited { retry_after } => {
            Duration::try_from_secs_f64(*retry_after).unwrap_or(if *retry_after > 0.0 {
                MAX_RETRY_DELAY
            } else {
                Duration::ZERO
            })
        }
        _ => BASE_BACKOFF.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1))),
    };
    delay.min(MAX_RETRY_DELAY)
}

/// Discord API client bound to one guild
pub struct DiscordClient {
    http: Client,
    base_url: String,
    token: SecretString,
    guild_id: u64,
    max_retries: u32,
}

impl DiscordClient {
    /// Create a new client from configuration
    pub fn new(config: &DiscordConfig) -> Result<Self, ConfigError> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "discord.token".to_string(),
            })?;
        let guild_id = config.guild_id.ok_or_else(|| ConfigError::Missing {
            field: "discord.guild_id".to_string(),
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(format!(
                "DiscordBot (mystery-admin, {})",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| ConfigError::Invalid {
                message: format!("cannot build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            base_url: config.api_url().to_string(),
            token,
            guild_id,
            max_retries: config.max_retries,
        })
    }

    /// Build a URL for an API endpoint
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Add authentication to a request
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", self.token.bot_authorization())
    }

    /// Execute a request, retrying rate limits and transient failures
    async fn execute(&self, request: RequestBuilder) -> DirectoryResult<Response> {
        let request = self.authenticate(request);
        let mut attempt = 0;

        loop {
            let req = request
                .try_clone()
                .ok_or_else(|| DirectoryError::InvalidResponse("Cannot clone request".to_string()))?;

            let error = match req.send().await {
                Ok(response) => match self.handle_response(response).await {
                    Ok(response) => return Ok(response),
                    Err(e) => e,
                },
                Err(e) => DirectoryError::Request(e),
            };

            if attempt >= self.max_retries || !error.is_transient() {
                return Err(error);
            }
            attempt += 1;

            let delay = retry_delay(&error, attempt);
            warn!(error = %error, attempt, delay_ms = delay.as_millis() as u64, "Retrying request");
            tokio::time::sleep(delay).await;
        }
    }

    /// Handle API response
    async fn handle_response(&self, response: Response) -> DirectoryResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::TOO_MANY_REQUESTS {
            debug!(body = %body, "Rate limited");
        }

        Err(DirectoryError::from_response(status.as_u16(), &body))
    }

    /// Make a GET request
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> DirectoryResult<T> {
        let response = self.execute(self.http.get(self.url(endpoint))).await?;
        response.json().await.map_err(|e| {
            DirectoryError::InvalidResponse(format!("Failed to parse response: {}", e))
        })
    }

    /// Make a request with a JSON body, ignoring the response body
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        body: &B,
    ) -> DirectoryResult<()> {
        let request = self.http.request(method, self.url(endpoint)).json(body);
        self.execute(request).await?;
        Ok(())
    }

    /// Make a DELETE request
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn delete(&self, endpoint: &str) -> DirectoryResult<()> {
        self.execute(self.http.delete(self.url(endpoint))).await?;
        Ok(())
    }

    async fn guild(&self) -> DirectoryResult<ApiGuild> {
        self.get(&format!("/guilds/{}", self.guild_id)).await
    }

    async fn channel(&self, channel: u64) -> DirectoryResult<ApiChannel> {
        self.get(&format!("/channels/{}", channel)).await
    }

    /// Delete the given messages, bulk where the API allows it
    async fn delete_messages(&self, channel: ChannelId, messages: &[ApiMessage]) -> DirectoryResult<()> {
        let now = SystemTime::now();
        let (recent, old): (Vec<&ApiMessage>, Vec<&ApiMessage>) =
            messages.iter().partition(|m| m.is_bulk_deletable(now));

        if recent.len() >= 2 {
            let body = BulkDelete {
                messages: recent.iter().map(|m| m.id.to_string()).collect(),
            };
            self.send_json(
                reqwest::Method::POST,
                &format!("/channels/{}/messages/bulk-delete", channel),
                &body,
            )
            .await?;
        } else {
            for message in &recent {
                self.delete(&format!("/channels/{}/messages/{}", channel, message.id))
                    .await?;
            }
        }

        for message in &old {
            self.delete(&format!("/channels/{}/messages/{}", channel, message.id))
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Directory for DiscordClient {
    async fn list_text_channels(&self) -> DirectoryResult<Vec<Channel>> {
        let channels: Vec<ApiChannel> = self
            .get(&format!("/guilds/{}/channels", self.guild_id))
            .await?;

        Ok(channels
            .into_iter()
            .map(ApiChannel::into_channel)
            .filter(|c| c.kind == ChannelKind::Text)
            .collect())
    }

    async fn list_roles(&self) -> DirectoryResult<Vec<Role>> {
        let roles: Vec<ApiRole> = self.get(&format!("/guilds/{}/roles", self.guild_id)).await?;
        Ok(roles
            .into_iter()
            .map(|r| r.into_role(self.guild_id))
            .collect())
    }

    async fn list_members(&self) -> DirectoryResult<Vec<Member>> {
        let owner_id = self.guild().await?.owner_id;
        let mut members = Vec::new();
        let mut after = None;

        loop {
            let query = QueryBuilder::new()
                .param("limit", MEMBER_PAGE)
                .optional("after", after)
                .build();
            let page: Vec<ApiMember> = self
                .get(&format!("/guilds/{}/members{}", self.guild_id, query))
                .await?;

            let full = page.len() == MEMBER_PAGE;
            after = page.last().map(|m| m.user.id);
            members.extend(page.into_iter().map(|m| m.into_member(owner_id)));

            if !full {
                break;
            }
        }

        debug!(members = members.len(), "Listed members");
        Ok(members)
    }

    async fn set_overwrite(
        &self,
        channel: ChannelId,
        role: RoleId,
        overwrite: Overwrite,
    ) -> DirectoryResult<()> {
        self.send_json(
            reqwest::Method::PUT,
            &format!("/channels/{}/permissions/{}", channel, role),
            &EditOverwrite::from(overwrite),
        )
        .await
    }

    async fn sync_permissions(&self, channel: ChannelId) -> DirectoryResult<()> {
        let Some(parent) = self.channel(channel.0).await?.parent_id else {
            debug!(channel = %channel, "Channel has no category to sync with");
            return Ok(());
        };

        let body = EditChannelOverwrites {
            permission_overwrites: self.channel(parent).await?.permission_overwrites,
        };
        self.send_json(
            reqwest::Method::PATCH,
            &format!("/channels/{}", channel),
            &body,
        )
        .await
    }

    async fn purge_messages(
        &self,
        channel: ChannelId,
        limit: Option<usize>,
    ) -> DirectoryResult<usize> {
        let mut deleted = 0;

        loop {
            let batch = match limit {
                Some(limit) if deleted >= limit => break,
                Some(limit) => (limit - deleted).min(MESSAGE_PAGE),
                None => MESSAGE_PAGE,
            };

            let query = QueryBuilder::new().param("limit", batch).build();
            let messages: Vec<ApiMessage> = self
                .get(&format!("/channels/{}/messages{}", channel, query))
                .await?;
            if messages.is_empty() {
                break;
            }

            self.delete_messages(channel, &messages).await?;
            deleted += messages.len();

            if messages.len() < batch {
                break;
            }
        }

        debug!(channel = %channel, deleted, "Purged messages");
        Ok(deleted)
    }

    async fn remove_role(&self, member: UserId, role: RoleId) -> DirectoryResult<()> {
        self.delete(&format!(
            "/guilds/{}/members/{}/roles/{}",
            self.guild_id, member, role
        ))
        .await
    }

    async fn set_nickname(&self, member: UserId, nickname: Option<String>) -> DirectoryResult<()> {
        self.send_json(
            reqwest::Method::PATCH,
            &format!("/guilds/{}/members/{}", self.guild_id, member),
            &EditNickname { nick: nickname },
        )
        .await
    }
}
