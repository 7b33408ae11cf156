use core::fmt::{self, Display};
use twilight_http::response::DeserializeBodyError;

#[derive(Debug)]
pub enum Error {
    UnsupportedInteraction,
    UnknownUser,
    /// Custom ID of a button or modal that we never issued.
    UnknownAction,
    /// The quiz panel was used outside of a guild.
    GuildOnly,
    /// Rejection modal submitted without a reason.
    MissingReason,
    /// Discord refused the request (e.g., closed direct messages).
    Http,
    /// Discord replied with a body we cannot make sense of.
    Schema,
    /// The outgoing message failed client-side validation.
    Validation,
}

impl From<twilight_http::Error> for Error {
    fn from(_: twilight_http::Error) -> Self {
        Self::Http
    }
}

impl From<DeserializeBodyError> for Error {
    fn from(_: DeserializeBodyError) -> Self {
        Self::Schema
    }
}

impl From<serde_json::Error> for Error {
    fn from(_: serde_json::Error) -> Self {
        Self::Schema
    }
}

impl From<model::action::UnknownAction> for Error {
    fn from(_: model::action::UnknownAction) -> Self {
        Self::UnknownAction
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnsupportedInteraction => "Interacción no soportada.",
            Self::UnknownUser => "No se pudo identificar al usuario.",
            Self::UnknownAction => "Este botón ya no es válido.",
            Self::GuildOnly => "El cuestionario solo se puede iniciar desde un servidor.",
            Self::MissingReason => "Debes indicar una razón de rechazo.",
            Self::Http => "Discord rechazó la petición.",
            Self::Schema => "Discord respondió con datos inesperados.",
            Self::Validation => "El mensaje no cumple los límites de Discord.",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
