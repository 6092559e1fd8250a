pub mod attachments;
pub mod coach;
pub mod error;
pub mod gateway;
pub mod repl;
pub mod session;
pub mod topics;

mod cli;

pub use cli::{Cli, Command};
pub use coach::{Coach, CoachConfig, SelectionOutcome, TurnOutcome};
pub use error::{CoachError, GatewayError};
pub use gateway::{GeminiGateway, ImageAttachment, ModelGateway};
pub use session::{Phase, Role, SessionState, TranscriptEntry};
pub use topics::Topic;
