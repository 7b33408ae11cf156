use crate::{
    error::{Error, Result},
    platform::{ApplicationId, ChannelId, GuildId, Outgoing, Platform, UserId},
};
use std::{string::String, sync::Mutex, vec::Vec};

#[derive(Clone, Debug, PartialEq)]
pub enum Sent {
    Direct(UserId, String),
    Channel(ChannelId, Outgoing),
    /// Content filled into a deferred interaction response.
    Edit(String),
}

/// In-memory [`Platform`] that records everything the bot sends.
#[derive(Default)]
pub struct Fake {
    /// Everything sent so far, in order.
    pub sent: Mutex<Vec<Sent>>,
    /// Users whose direct messages are closed.
    pub closed: Vec<UserId>,
    /// Guilds we can no longer see.
    pub unreachable: Vec<GuildId>,
    /// Known guild channels by name.
    pub channels: Vec<(GuildId, &'static str, ChannelId)>,
}

impl Fake {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    /// Plain-text messages posted in the given channel.
    pub fn texts_in(&self, channel: ChannelId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Channel(id, Outgoing { content: Some(content), .. }) if id == channel => Some(content),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Edit(content) => Some(content),
                _ => None,
            })
            .collect()
    }

    pub fn directs_to(&self, user: UserId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Direct(id, content) if id == user => Some(content),
                _ => None,
            })
            .collect()
    }
}

impl Platform for Fake {
    async fn direct_message(&self, user: UserId, content: &str) -> Result<()> {
        if self.closed.contains(&user) {
            return Err(Error::Http);
        }
        self.sent.lock().unwrap().push(Sent::Direct(user, String::from(content)));
        Ok(())
    }

    async fn create_message(&self, channel: ChannelId, message: Outgoing) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Channel(channel, message));
        Ok(())
    }

    async fn find_channel(&self, guild: GuildId, name: &str) -> Result<Option<ChannelId>> {
        if self.unreachable.contains(&guild) {
            return Err(Error::Http);
        }
        Ok(self.channels.iter().find(|&&(g, n, _)| g == guild && n == name).map(|&(_, _, id)| id))
    }

    async fn edit_response(&self, _: ApplicationId, _: &str, content: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Edit(String::from(content)));
        Ok(())
    }
}
