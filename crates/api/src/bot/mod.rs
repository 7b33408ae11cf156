mod review;


pub use review::{panel, reason_modal, record, REASON_INPUT};

use crate::{
    error::{Error, Result},
    platform::{ApplicationId, ChannelId, Delivery, GuildId, Outgoing, Platform, UserId},
};
use alloc::{boxed::Box, string::String};
use model::{Action, Input, Session, Transition};
use store::SessionStore;
use twilight_model::{
    application::interaction::{Interaction, InteractionData, InteractionType},
    channel::{message::MessageFlags, Message},
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
    id::Id,
};

/// Name of the channel where finished quizzes are posted, unless configured otherwise.
pub const DEFAULT_STAFF_CHANNEL: &str = "revisión-cuestionarios";

/// Guild message that summons the quiz panel.
const PANEL_COMMAND: &str = "!panel";

const GREETING: &str = "¡Vamos a empezar tu cuestionario RP!";
const DM_SENT: &str = "Te he enviado un DM con el cuestionario. ¡Revísalo!";
const DM_CLOSED: &str = "No pude enviarte DM. Activa tus mensajes privados.";
const CANCELLED: &str = "Has cancelado el cuestionario.";
const APPROVED_STAFF: &str = "Aprobado y notificado por DM.";
const REJECTED_STAFF: &str = "Rechazado y notificado por DM.";

/// A message received over the gateway, stripped down to what the bot reacts to.
#[derive(Clone, Debug)]
pub struct Inbound {
    pub author: UserId,
    /// Username of the author, shown to staff in the review record.
    pub name: String,
    pub bot: bool,
    pub channel: ChannelId,
    /// Absent for direct messages.
    pub guild: Option<GuildId>,
    pub content: String,
}

impl From<Message> for Inbound {
    fn from(msg: Message) -> Self {
        Self {
            author: msg.author.id,
            name: msg.author.name,
            bot: msg.author.bot,
            channel: msg.channel_id,
            guild: msg.guild_id,
            content: msg.content,
        }
    }
}

pub struct Bot<P, S> {
    /// Outbound Discord operations.
    platform: P,
    /// Quizzes currently in progress.
    sessions: S,
    /// Name of the staff review channel.
    staff: Box<str>,
}

impl<P: Platform, S: SessionStore> Bot<P, S> {
    pub fn new(platform: P, sessions: S, staff: Box<str>) -> Self {
        Self { platform, sessions, staff }
    }

    pub const fn platform(&self) -> &P {
        &self.platform
    }

    pub const fn sessions(&self) -> &S {
        &self.sessions
    }

    pub async fn on_message(&self, msg: Inbound) {
        if msg.bot {
            return;
        }

        if msg.guild.is_some() {
            self.on_guild_message(msg).await
        } else {
            self.on_direct_message(msg).await
        }
    }

    async fn on_guild_message(&self, msg: Inbound) {
        if msg.content.trim() != PANEL_COMMAND {
            return;
        }

        log::info!("Posting quiz panel in channel {}.", msg.channel);
        if let Err(err) = self.platform.create_message(msg.channel, review::panel()).await {
            log::error!("Cannot post quiz panel in channel {}: {err}", msg.channel);
        }
    }

    async fn on_direct_message(&self, msg: Inbound) {
        let uid = msg.author.into_nonzero();
        let Some(session) = self.sessions.get(uid) else {
            return;
        };

        match session.advance(Input::parse(&msg.content)) {
            Transition::Cancelled => {
                self.sessions.delete(uid);
                log::info!("User {} cancelled their quiz.", msg.author);
                self.reply(msg.channel, CANCELLED).await;
            }
            Transition::Pending(session) => {
                let prompt = session.prompt();
                self.sessions.set(uid, session);
                self.reply(msg.channel, prompt).await;
            }
            Transition::Complete(submission) => {
                self.sessions.delete(uid);
                log::info!("User {} completed their quiz.", msg.author);
                self.submit(&msg, &submission).await;
            }
        }
    }

    async fn reply(&self, channel: ChannelId, text: &str) {
        if let Err(err) = self.platform.create_message(channel, Outgoing::text(text)).await {
            log::warn!("Cannot reply in channel {channel}: {err}");
        }
    }

    /// Opens a fresh session for the user and sends the first prompt. Any
    /// quiz already in progress for the user is discarded. If the user cannot
    /// be reached, no session is left behind.
    pub async fn start_quiz(&self, user: UserId, guild: GuildId) -> Result<()> {
        let uid = user.into_nonzero();
        let session = Session::new(guild.into_nonzero());
        let prompt = session.prompt();
        if let Some(previous) = self.sessions.set(uid, session) {
            log::warn!("User {user} restarted their quiz and lost {} answers.", previous.step());
        }

        let delivered = async {
            self.platform.direct_message(user, GREETING).await?;
            self.platform.direct_message(user, prompt).await
        };

        if let Err(err) = delivered.await {
            self.sessions.delete(uid);
            log::info!("Cannot deliver the quiz to user {user}: {err}");
            return Err(err);
        }

        log::info!("User {user} started a quiz in guild {guild}.");
        Ok(())
    }

    /// Answers an interaction right away. Anything that talks to Discord is
    /// left in [`Reply::followup`] so the acknowledgement is never held back.
    pub fn on_interaction(&self, interaction: Interaction) -> Reply {
        let app = interaction.application_id;
        let token = interaction.token.clone();
        let result = match interaction.kind {
            InteractionType::Ping => Ok((InteractionResponse { kind: InteractionResponseType::Pong, data: None }, None)),
            InteractionType::MessageComponent => Self::on_msg_component(interaction),
            InteractionType::ModalSubmit => Self::on_modal_submit(interaction),
            _ => Err(Error::UnsupportedInteraction),
        };

        use alloc::string::ToString;
        match result {
            Ok((response, task)) => Reply { response, followup: task.map(|task| Followup { app, token, task }) },
            Err(err) => Reply { response: ephemeral(err.to_string()), followup: None },
        }
    }

    fn on_msg_component(interaction: Interaction) -> Result<(InteractionResponse, Option<Task>)> {
        let user = interaction.member.and_then(|member| member.user).or(interaction.user).ok_or(Error::UnknownUser)?;
        let Some(InteractionData::MessageComponent(data)) = interaction.data else {
            return Err(Error::Schema);
        };

        match data.custom_id.parse::<Action>()? {
            Action::Start => {
                let guild = interaction.guild_id.ok_or(Error::GuildOnly)?;
                let response = InteractionResponse {
                    kind: InteractionResponseType::DeferredChannelMessageWithSource,
                    data: Some(InteractionResponseData { flags: Some(MessageFlags::EPHEMERAL), ..Default::default() }),
                };
                Ok((response, Some(Task::Start { user: user.id, guild })))
            }
            Action::Approve(uid) => Ok((deferred_update(), Some(Task::Approve { staff: user.id, target: Id::from(uid) }))),
            Action::Reject(uid) => Ok((review::reason_modal(uid), None)),
            Action::Reason(_) => Err(Error::UnknownAction),
        }
    }

    fn on_modal_submit(interaction: Interaction) -> Result<(InteractionResponse, Option<Task>)> {
        let user = interaction.member.and_then(|member| member.user).or(interaction.user).ok_or(Error::UnknownUser)?;
        let Some(InteractionData::ModalSubmit(data)) = interaction.data else {
            return Err(Error::Schema);
        };

        let Action::Reason(uid) = data.custom_id.parse::<Action>()? else {
            return Err(Error::UnknownAction);
        };

        let reason = data
            .components
            .into_iter()
            .flat_map(|row| row.components)
            .find(|input| input.custom_id == REASON_INPUT)
            .and_then(|input| input.value)
            .filter(|reason| !reason.trim().is_empty())
            .ok_or(Error::MissingReason)?;

        Ok((deferred_update(), Some(Task::Reject { staff: user.id, target: Id::from(uid), reason })))
    }

    /// Carries out the work of an acknowledged interaction, then fills in its response.
    pub async fn follow_up(&self, followup: Followup) {
        let Followup { app, token, task } = followup;
        let content = match task {
            Task::Start { user, guild } => match self.start_quiz(user, guild).await {
                Ok(()) => DM_SENT,
                Err(_) => DM_CLOSED,
            },
            Task::Approve { staff, target } => {
                if let Delivery::Swallowed(err) = self.approve(target).await {
                    log::warn!("Approval notice for user {target} was not delivered: {err}");
                }
                log::info!("User {staff} approved user {target}.");
                APPROVED_STAFF
            }
            Task::Reject { staff, target, reason } => {
                match self.reject(target, &reason).await {
                    Ok(Delivery::Delivered) => {}
                    Ok(Delivery::Swallowed(err)) => {
                        log::warn!("Rejection notice for user {target} was not delivered: {err}")
                    }
                    Err(err) => {
                        log::error!("Cannot reject user {target}: {err}");
                        return;
                    }
                }
                log::info!("User {staff} rejected user {target}.");
                REJECTED_STAFF
            }
        };

        if let Err(err) = self.platform.edit_response(app, &token, content).await {
            log::error!("Cannot fill in deferred interaction response: {err}");
        }
    }
}

/// Work that an interaction asks for beyond its immediate response.
#[derive(Debug)]
enum Task {
    Start { user: UserId, guild: GuildId },
    Approve { staff: UserId, target: UserId },
    Reject { staff: UserId, target: UserId, reason: String },
}

/// A [`Task`] bound to the interaction whose response it completes.
#[derive(Debug)]
pub struct Followup {
    app: ApplicationId,
    token: String,
    task: Task,
}

/// How to answer an interaction, plus the work to run once it is acknowledged.
#[derive(Debug)]
pub struct Reply {
    pub response: InteractionResponse,
    pub followup: Option<Followup>,
}

fn deferred_update() -> InteractionResponse {
    InteractionResponse { kind: InteractionResponseType::DeferredUpdateMessage, data: None }
}

fn ephemeral(content: String) -> InteractionResponse {
    InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(InteractionResponseData {
            content: Some(content),
            flags: Some(MessageFlags::EPHEMERAL),
            ..Default::default()
        }),
    }
}
