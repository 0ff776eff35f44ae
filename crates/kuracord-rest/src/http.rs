//! reqwest-backed implementation of the REST seam

use crate::api::Api;
use crate::error::RestError;
use crate::routes;
use async_trait::async_trait;
use kuracord_core::{Channel, GuildData, Member, Snowflake, User};
use kuracord_common::ClientConfig;
use reqwest::header::AUTHORIZATION;
use std::fmt;

/// HTTP client for the Kuracord REST API
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpApi {
    /// Build a client from the configuration
    ///
    /// # Errors
    /// Returns `RestError::Transport` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, RestError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.rest_url.clone(),
            token: config.formatted_token(),
        })
    }

    async fn get_json<T>(&self, url: String) -> Result<T, RestError>
    where
        T: serde::de::DeserializeOwned,
    {
        tracing::trace!(url = %url, "REST request");

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, &self.token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RestError::from_status(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(RestError::Decode)
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn current_user(&self) -> Result<User, RestError> {
        self.get_json(routes::current_user(&self.base_url)).await
    }

    async fn guild(&self, guild_id: Snowflake) -> Result<GuildData, RestError> {
        self.get_json(routes::guild(&self.base_url, guild_id)).await
    }

    async fn channel(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> Result<Channel, RestError> {
        // there is no per-channel endpoint; the guild's channel list is the
        // lookup surface
        let channels: Vec<Channel> = self
            .get_json(routes::guild_channels(&self.base_url, guild_id))
            .await?;

        let mut channel = channels
            .into_iter()
            .find(|c| c.id == channel_id)
            .ok_or_else(|| RestError::NotFound(format!("channel {channel_id} in guild {guild_id}")))?;
        channel.guild_id = Some(guild_id);

        Ok(channel)
    }

    async fn member(&self, guild_id: Snowflake, member_id: Snowflake) -> Result<Member, RestError> {
        let mut member: Member = self
            .get_json(routes::guild_member(&self.base_url, guild_id, member_id))
            .await?;
        member.guild_id = guild_id;

        Ok(member)
    }
}

impl fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the token stays out of debug output
        f.debug_struct("HttpApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}
