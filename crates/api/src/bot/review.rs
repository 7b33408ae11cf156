use super::{Bot, Inbound};
use crate::{
    error::{Error, Result},
    platform::{Delivery, Outgoing, Platform, UserId},
};
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::num::NonZeroU64;
use model::{Action, Submission};
use store::SessionStore;
use twilight_model::{
    channel::message::{
        component::{ActionRow, Button, ButtonStyle, TextInput, TextInputStyle},
        embed::EmbedField,
        Component, Embed,
    },
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
    id::Id,
};

/// Custom ID of the text input inside the rejection modal.
pub const REASON_INPUT: &str = "reason";

pub(super) const APPROVED: &str = "✅ Has pasado la prueba. ¡Bienvenido a Albacete RP!";
pub(super) const SUBMITTED: &str = "Tus respuestas han sido enviadas al staff. Recibirás un DM con el resultado.";
const UNDELIVERED: &str = "No se pudieron enviar tus respuestas al staff. Inténtalo de nuevo más tarde.";

const PANEL_COLOR: u32 = 0x00A3FF;
const RECORD_COLOR: u32 = 0xFFD000;

/// Discord refuses embed field values longer than this (in characters).
const FIELD_VALUE_LIMIT: usize = 1024;

/// Discord refuses embeds whose text adds up to more than this (in characters).
const EMBED_LIMIT: usize = 6000;

/// Rejection reasons are echoed in a direct message, which caps out at 2000 characters.
const REASON_LIMIT: u16 = 1800;

impl<P: Platform, S: SessionStore> Bot<P, S> {
    /// Posts the finished quiz to the staff channel of the guild it was started in.
    /// The answers are dropped if the channel does not exist.
    pub(super) async fn submit(&self, msg: &Inbound, submission: &Submission) {
        let guild = Id::from(submission.guild());
        let channel = match self.platform.find_channel(guild, &self.staff).await {
            Ok(Some(channel)) => channel,
            Ok(None) => {
                log::warn!("Guild {guild} has no channel named {:?}. Dropping answers of user {}.", self.staff, msg.author);
                let text = alloc::format!("El canal \"{}\" no existe.", self.staff);
                self.reply(msg.channel, &text).await;
                return;
            }
            Err(err) => {
                log::warn!("Cannot reach guild {guild} to submit answers of user {}: {err}", msg.author);
                return;
            }
        };

        if let Err(err) = self.platform.create_message(channel, record(msg.author, &msg.name, submission)).await {
            log::error!("Cannot post answers of user {} in channel {channel}: {err}", msg.author);
            self.reply(msg.channel, UNDELIVERED).await;
            return;
        }

        self.reply(msg.channel, SUBMITTED).await;
    }

    /// Tells the user they passed. Failure to reach them is swallowed.
    pub async fn approve(&self, user: UserId) -> Delivery {
        self.platform.direct_message(user, APPROVED).await.into()
    }

    /// Tells the user they failed and why. Failure to reach them is swallowed,
    /// but a blank reason is refused outright.
    pub async fn reject(&self, user: UserId, reason: &str) -> Result<Delivery> {
        if reason.trim().is_empty() {
            return Err(Error::MissingReason);
        }

        let text = alloc::format!("❌ No has pasado la prueba.\nRazón: {reason}");
        Ok(self.platform.direct_message(user, &text).await.into())
    }
}

fn button(action: Action, label: &str, style: ButtonStyle) -> Component {
    Component::Button(Button {
        custom_id: Some(action.to_string()),
        disabled: false,
        emoji: None,
        label: Some(String::from(label)),
        style,
        url: None,
    })
}

fn embed(title: String, description: String, color: u32, fields: Vec<EmbedField>) -> Embed {
    Embed {
        fields,
        kind: String::from("rich"),
        color: Some(color),
        title: Some(title),
        description: Some(description),
        author: None,
        footer: None,
        image: None,
        provider: None,
        thumbnail: None,
        timestamp: None,
        url: None,
        video: None,
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return String::from(text);
    }

    let mut head: String = text.chars().take(limit.saturating_sub(1)).collect();
    head.push('…');
    head
}

/// The message with the button that starts a quiz.
pub fn panel() -> Outgoing {
    let description = "Pulsa el botón para iniciar tu cuestionario en DM.\nAsegúrate de tener los DMs abiertos.";
    Outgoing {
        content: None,
        embeds: Vec::from([embed(
            String::from("📋 Panel de cuestionarios RP"),
            String::from(description),
            PANEL_COLOR,
            Vec::new(),
        )]),
        components: Vec::from([Component::ActionRow(ActionRow {
            components: Vec::from([button(Action::Start, "Iniciar cuestionario", ButtonStyle::Primary)]),
        })]),
    }
}

/// Splits the embed budget between the answers. Short answers keep their full
/// length, so whatever they leave over goes to the longer ones.
fn allot(lengths: &[usize], budget: usize, cap: usize) -> Vec<usize> {
    let mut order: Vec<_> = (0..lengths.len()).collect();
    order.sort_unstable_by_key(|&i| lengths[i]);

    let mut limits = alloc::vec![0; lengths.len()];
    let mut remaining = budget;
    for (k, i) in order.into_iter().enumerate() {
        let share = remaining / (lengths.len() - k);
        let limit = lengths[i].min(share).min(cap);
        remaining -= limit;
        limits[i] = limit;
    }
    limits
}

/// The review record posted to staff: one field per prompt plus the approve/reject buttons.
pub fn record(user: UserId, name: &str, submission: &Submission) -> Outgoing {
    let title = alloc::format!("Respuestas de {name}");
    let description = alloc::format!("Usuario: <@{user}> (`{user}`)");
    let entries: Vec<_> = submission
        .entries()
        .map(|entry| (alloc::format!("{}. {}", entry.number, entry.prompt), entry.answer))
        .collect();

    let fixed = title.chars().count()
        + description.chars().count()
        + entries.iter().map(|(name, _)| name.chars().count()).sum::<usize>();
    let lengths: Vec<_> = entries.iter().map(|(_, answer)| answer.chars().count()).collect();
    let limits = allot(&lengths, EMBED_LIMIT.saturating_sub(fixed), FIELD_VALUE_LIMIT);

    let fields = entries
        .into_iter()
        .zip(limits)
        .map(|((name, answer), limit)| EmbedField { inline: false, name, value: truncate(answer, limit) })
        .collect();

    let uid = user.into_nonzero();
    Outgoing {
        content: None,
        embeds: Vec::from([embed(title, description, RECORD_COLOR, fields)]),
        components: Vec::from([Component::ActionRow(ActionRow {
            components: Vec::from([
                button(Action::Approve(uid), "✅ Aprobar", ButtonStyle::Success),
                button(Action::Reject(uid), "❌ Rechazar", ButtonStyle::Danger),
            ]),
        })]),
    }
}

/// The modal asking staff why the given user is being rejected.
pub fn reason_modal(user: NonZeroU64) -> InteractionResponse {
    let input = Component::TextInput(TextInput {
        custom_id: String::from(REASON_INPUT),
        label: String::from("Escribe la razón"),
        max_length: Some(REASON_LIMIT),
        min_length: Some(1),
        placeholder: None,
        required: Some(true),
        style: TextInputStyle::Paragraph,
        value: None,
    });

    InteractionResponse {
        kind: InteractionResponseType::Modal,
        data: Some(InteractionResponseData {
            custom_id: Some(Action::Reason(user).to_string()),
            title: Some(String::from("Razón de rechazo")),
            components: Some(Vec::from([Component::ActionRow(ActionRow { components: Vec::from([input]) })])),
            ..Default::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{allot, record, truncate, EMBED_LIMIT, FIELD_VALUE_LIMIT};
    use alloc::{string::String, vec::Vec};
    use core::num::NonZeroU64;
    use model::{prompt::PROMPT_COUNT, Input, Session, Submission, Transition};
    use twilight_model::id::Id;

    fn submission(answers: &[String]) -> Submission {
        let mut session = Session::new(NonZeroU64::new(1).unwrap());
        for answer in answers {
            match session.advance(Input::Answer(answer)) {
                Transition::Pending(next) => session = next,
                Transition::Complete(done) => return done,
                Transition::Cancelled => unreachable!(),
            }
        }
        panic!("quiz left unfinished");
    }

    fn embed_length(answers: &[String]) -> (usize, Vec<String>) {
        let message = record(Id::new(42), "pepito", &submission(answers));
        let embed = &message.embeds[0];
        let fields = embed.fields.iter().map(|field| field.name.chars().count() + field.value.chars().count());
        let total = embed.title.as_deref().map_or(0, |title| title.chars().count())
            + embed.description.as_deref().map_or(0, |description| description.chars().count())
            + fields.sum::<usize>();
        (total, embed.fields.iter().map(|field| field.value.clone()).collect())
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate("SI ACEPTO", 1024), "SI ACEPTO");
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[test]
    fn long_text_is_cut_on_char_boundary() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("ñññññ", 3), "ññ…");
        assert_eq!(truncate("ñññññ", 3).chars().count(), 3);
    }

    #[test]
    fn leftover_budget_goes_to_long_answers() {
        assert_eq!(allot(&[10, 500, 20], 1000, 1024), [10, 500, 20]);
        assert_eq!(allot(&[10, 2000, 3000], 1000, 1024), [10, 495, 495]);
        assert_eq!(allot(&[10, 2000, 30], 5000, 1024), [10, 1024, 30]);
        assert_eq!(allot(&[90, 90, 90], 30, 1024), [10, 10, 10]);
    }

    #[test]
    fn long_answers_fit_in_one_embed() {
        let answers: Vec<_> = (0..PROMPT_COUNT).map(|_| "a".repeat(700)).collect();
        let (total, values) = embed_length(&answers);
        assert!(total <= EMBED_LIMIT, "embed holds {total} characters");
        assert!(values.iter().all(|value| value.ends_with('…')));
        assert!(values.iter().all(|value| value.chars().count() <= FIELD_VALUE_LIMIT));
    }

    #[test]
    fn one_long_answer_keeps_the_field_limit() {
        let mut answers: Vec<_> = (0..PROMPT_COUNT).map(|_| String::from("Sí")).collect();
        answers[2] = "b".repeat(3000);
        let (total, values) = embed_length(&answers);
        assert!(total <= EMBED_LIMIT);
        assert_eq!(values[2].chars().count(), FIELD_VALUE_LIMIT);
        assert_eq!(values[0], "Sí");
    }
}
