use core::{
    fmt::{self, Display},
    num::NonZeroU64,
    str::FromStr,
};

/// Identifies the intent behind a button or modal, encoded in its custom ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// The panel button that starts a quiz for whoever clicks it.
    Start,
    /// Staff approval of the given user's submission.
    Approve(NonZeroU64),
    /// Staff rejection of the given user's submission. Opens the reason modal.
    Reject(NonZeroU64),
    /// Submission of the rejection reason modal.
    Reason(NonZeroU64),
}

impl Action {
    const START: &'static str = "startQuiz";
    const APPROVE: &'static str = "approve";
    const REJECT: &'static str = "reject";
    const REASON: &'static str = "rejectModal";
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str(Self::START),
            Self::Approve(user) => write!(f, "{}_{user}", Self::APPROVE),
            Self::Reject(user) => write!(f, "{}_{user}", Self::REJECT),
            Self::Reason(user) => write!(f, "{}_{user}", Self::REASON),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownAction;

impl Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown custom ID")
    }
}

impl FromStr for Action {
    type Err = UnknownAction;
    fn from_str(id: &str) -> Result<Self, Self::Err> {
        if id == Self::START {
            return Ok(Self::Start);
        }

        let (kind, user) = id.split_once('_').ok_or(UnknownAction)?;
        let user = user.parse().map_err(|_| UnknownAction)?;
        Ok(match kind {
            Self::APPROVE => Self::Approve(user),
            Self::REJECT => Self::Reject(user),
            Self::REASON => Self::Reason(user),
            _ => return Err(UnknownAction),
        })
    }
}
