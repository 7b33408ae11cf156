use crate::prompt::{PROMPTS, PROMPT_COUNT};
use alloc::{string::String, vec::Vec};
use core::{
    fmt::{self, Display},
    num::NonZeroU64,
};
use serde::{Deserialize, Serialize};

/// A quiz that is still awaiting answers. Finished quizzes are never represented
/// as a [`Session`]: answering the last prompt yields a [`Submission`](crate::Submission)
/// instead, so the current step is always a valid index into [`PROMPTS`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSession")]
pub struct Session {
    /// Guild in which the quiz was started. The staff channel is looked up here.
    pub(crate) guild: NonZeroU64,
    /// Answers collected so far, aligned to [`PROMPTS`].
    pub(crate) answers: Vec<String>,
}

impl Session {
    pub const fn new(guild: NonZeroU64) -> Self {
        Self { guild, answers: Vec::new() }
    }

    pub const fn guild(&self) -> NonZeroU64 {
        self.guild
    }

    /// Index of the prompt currently awaiting an answer.
    pub fn step(&self) -> usize {
        self.answers.len()
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// The prompt the user should be answering right now.
    pub fn prompt(&self) -> &'static str {
        PROMPTS[self.step()]
    }
}

#[derive(Deserialize)]
struct RawSession {
    guild: NonZeroU64,
    answers: Vec<String>,
}

/// Raised when a stored session claims to have answered every prompt.
#[derive(Debug)]
pub struct Exhausted(usize);

impl Display for Exhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session holds {} answers but only {PROMPT_COUNT} prompts exist", self.0)
    }
}

impl TryFrom<RawSession> for Session {
    type Error = Exhausted;
    fn try_from(RawSession { guild, answers }: RawSession) -> Result<Self, Self::Error> {
        if answers.len() >= PROMPT_COUNT {
            return Err(Exhausted(answers.len()));
        }
        Ok(Self { guild, answers })
    }
}
