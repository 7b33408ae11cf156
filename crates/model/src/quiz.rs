use crate::{
    prompt::{PROMPTS, PROMPT_COUNT},
    session::Session,
};
use alloc::{string::String, vec::Vec};
use core::num::NonZeroU64;

/// Replying with this word (in any letter case) abandons the quiz.
pub const CANCEL_KEYWORD: &str = "cancelar";

/// Shown to staff in place of an empty answer.
pub const NO_ANSWER: &str = "Sin respuesta";

/// A direct message interpreted in the context of a running quiz.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'text> {
    Cancel,
    Answer(&'text str),
}

impl<'text> Input<'text> {
    pub fn parse(text: &'text str) -> Self {
        let text = text.trim();
        if text.eq_ignore_ascii_case(CANCEL_KEYWORD) {
            Self::Cancel
        } else {
            Self::Answer(text)
        }
    }
}

/// Where a session ends up after receiving one [`Input`].
#[derive(Debug)]
pub enum Transition {
    /// The user abandoned the quiz. The session must be discarded.
    Cancelled,
    /// The session now awaits an answer to [`Session::prompt`].
    Pending(Session),
    /// Every prompt has been answered. The session must be discarded.
    Complete(Submission),
}

impl Session {
    pub fn advance(mut self, input: Input<'_>) -> Transition {
        let Input::Answer(text) = input else {
            return Transition::Cancelled;
        };

        self.answers.push(String::from(text));
        if self.answers.len() < PROMPT_COUNT {
            Transition::Pending(self)
        } else {
            Transition::Complete(Submission { guild: self.guild, answers: self.answers })
        }
    }
}

/// The complete set of answers of a finished quiz.
#[derive(Debug)]
pub struct Submission {
    guild: NonZeroU64,
    answers: Vec<String>,
}

/// One prompt paired with its answer, numbered from one.
#[derive(Debug, PartialEq, Eq)]
pub struct Entry<'s> {
    pub number: usize,
    pub prompt: &'static str,
    pub answer: &'s str,
}

impl Submission {
    pub const fn guild(&self) -> NonZeroU64 {
        self.guild
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Pairs every prompt with its answer. Missing or empty answers are
    /// replaced with [`NO_ANSWER`].
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> + '_ {
        PROMPTS.iter().zip(1..).enumerate().map(|(i, (&prompt, number))| {
            let answer = self.answers.get(i).map(String::as_str).filter(|text| !text.is_empty()).unwrap_or(NO_ANSWER);
            Entry { number, prompt, answer }
        })
    }
}
