use crate::error::{Error, Result};
use alloc::{string::String, vec::Vec};
use core::future::Future;
use twilight_model::{
    channel::message::{Component, Embed},
    http::interaction::InteractionResponse,
    id::{
        marker::{ApplicationMarker, ChannelMarker, GuildMarker, InteractionMarker, UserMarker},
        Id,
    },
};

pub type ApplicationId = Id<ApplicationMarker>;
pub type UserId = Id<UserMarker>;
pub type ChannelId = Id<ChannelMarker>;
pub type GuildId = Id<GuildMarker>;

/// A message to be posted in some channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outgoing {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub components: Vec<Component>,
}

impl Outgoing {
    pub fn text(content: &str) -> Self {
        Self { content: Some(String::from(content)), ..Default::default() }
    }
}

/// Everything the bot needs from Discord besides answering interactions.
pub trait Platform: Send + Sync {
    /// Sends a direct message to the user, opening the DM channel if needed.
    /// Fails when the user does not accept direct messages from us.
    fn direct_message(&self, user: UserId, content: &str) -> impl Future<Output = Result<()>> + Send;

    fn create_message(&self, channel: ChannelId, message: Outgoing) -> impl Future<Output = Result<()>> + Send;

    /// Finds a guild channel by exact name. Fails when the guild itself cannot be reached.
    fn find_channel(&self, guild: GuildId, name: &str) -> impl Future<Output = Result<Option<ChannelId>>> + Send;

    /// Fills in a deferred interaction response and strips the components of
    /// the message it belongs to.
    fn edit_response(&self, app: ApplicationId, token: &str, content: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Outcome of a best-effort notification. A swallowed failure is never
/// propagated further than a log line.
#[must_use]
#[derive(Debug)]
pub enum Delivery {
    Delivered,
    Swallowed(Error),
}

impl Delivery {
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl From<Result<()>> for Delivery {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::Delivered,
            Err(err) => Self::Swallowed(err),
        }
    }
}

/// [`Platform`] backed by the Discord REST API.
pub struct Discord {
    client: twilight_http::Client,
}

impl Discord {
    pub fn new(token: String) -> Self {
        Self { client: twilight_http::Client::new(token) }
    }

    /// Answers an interaction that arrived over the gateway rather than the HTTP endpoint.
    pub async fn create_response(
        &self,
        app: ApplicationId,
        interaction: Id<InteractionMarker>,
        token: &str,
        response: &InteractionResponse,
    ) -> Result<()> {
        self.client.interaction(app).create_response(interaction, token, response).await?;
        Ok(())
    }
}

impl Platform for Discord {
    async fn direct_message(&self, user: UserId, content: &str) -> Result<()> {
        let channel = self.client.create_private_channel(user).await?.model().await?;
        self.client.create_message(channel.id).content(content).map_err(|_| Error::Validation)?.await?;
        Ok(())
    }

    async fn create_message(&self, channel: ChannelId, message: Outgoing) -> Result<()> {
        let mut request = self.client.create_message(channel);
        if let Some(content) = message.content.as_deref() {
            request = request.content(content).map_err(|_| Error::Validation)?;
        }
        request
            .embeds(&message.embeds)
            .map_err(|_| Error::Validation)?
            .components(&message.components)
            .map_err(|_| Error::Validation)?
            .await?;
        Ok(())
    }

    async fn find_channel(&self, guild: GuildId, name: &str) -> Result<Option<ChannelId>> {
        let channels = self.client.guild_channels(guild).await?.models().await?;
        Ok(channels.into_iter().find(|channel| channel.name.as_deref() == Some(name)).map(|channel| channel.id))
    }

    async fn edit_response(&self, app: ApplicationId, token: &str, content: &str) -> Result<()> {
        self.client
            .interaction(app)
            .update_response(token)
            .content(Some(content))
            .map_err(|_| Error::Validation)?
            .components(Some(&[]))
            .map_err(|_| Error::Validation)?
            .await?;
        Ok(())
    }
}
