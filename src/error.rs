use thiserror::Error;

use crate::session::Phase;

/// Why a student reply was refused before reaching the model.
///
/// Model failures are not represented here: the coach absorbs them into the
/// transcript as an apology.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoachError {
    #[error("Antwoord is leeg")]
    EmptyReply,

    #[error("Antwoord is te lang ({len} tekens, maximaal {max})")]
    ReplyTooLong { len: usize, max: usize },

    #[error("De reflectie is afgerond; start opnieuw met /opnieuw")]
    SessionCompleted,

    #[error("Kies eerst een verdiepingsonderwerp (fase {phase})")]
    TopicRequired { phase: Phase },
}

/// Failure reported by a model gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::UnexpectedResponse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
