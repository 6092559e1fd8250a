//! The dialogue controller: validates replies, composes phase-aware
//! instructions, calls the model gateway and advances the session.

pub mod prompts;

use std::time::Duration;

use crate::{
    error::CoachError,
    gateway::{ImageAttachment, ModelGateway},
    session::{Advance, Phase, Session, SessionState, TranscriptEntry},
    topics::Topic,
};

/// Pause before the closing message is shown. Purely cosmetic.
pub const CLOSING_DELAY: Duration = Duration::from_secs(1);

pub const DEFAULT_MAX_REPLY_CHARS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct CoachConfig {
    /// Longest accepted student reply, in characters.
    pub max_reply_chars: usize,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            max_reply_chars: DEFAULT_MAX_REPLY_CHARS,
        }
    }
}

/// What happened to an accepted reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model answered and the counters advanced.
    Answered(Advance),
    /// The model call failed. An apology was recorded; counters unchanged.
    Apologized,
    /// No credential configured. A hint was recorded and nothing else changed.
    NotConfigured,
}

impl TurnOutcome {
    /// The presentation layer should now offer the topic list.
    pub const fn topic_selection_required(self) -> bool {
        matches!(self, Self::Answered(Advance::Entered(Phase::Deepening)))
    }

    /// The session just finished and the closing message was appended.
    pub const fn completed(self) -> bool {
        matches!(self, Self::Answered(Advance::Entered(Phase::Completed)))
    }
}

/// Result of a topic selection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Topic set and an opening question generated.
    Opened(Topic),
    /// Topic set, but the model failed. An apology was recorded instead of
    /// the opening question.
    OpenedWithApology(Topic),
    /// The id is not in the catalog. Ignored.
    UnknownTopic,
    /// A topic was already chosen this session.
    AlreadySelected(Topic),
    /// Topics can only be chosen at the start of the deepening phase.
    NotAvailable(Phase),
    /// No credential configured. A hint was recorded.
    NotConfigured,
}

/// Drives one reflection session against a model gateway.
///
/// Every operation takes `&mut self`, so a second turn cannot start while
/// one is awaiting the gateway.
pub struct Coach<G> {
    gateway: G,
    config: CoachConfig,
    session: Session,
    pending_images: Vec<ImageAttachment>,
}

impl<G: ModelGateway> Coach<G> {
    pub fn new(gateway: G, config: CoachConfig) -> Self {
        Self {
            gateway,
            config,
            session: Session::new(prompts::WELCOME_MESSAGE),
            pending_images: Vec::new(),
        }
    }

    pub const fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        self.session.transcript()
    }

    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The question the student is currently expected to answer.
    pub fn current_question(&self) -> Option<&'static str> {
        let state = self.state();
        prompts::phase_question(state.phase(), state.iteration())
    }

    /// Queue an image to accompany the next reply.
    pub fn attach_image(&mut self, image: ImageAttachment) {
        self.pending_images.push(image);
    }

    pub fn pending_images(&self) -> &[ImageAttachment] {
        &self.pending_images
    }

    /// Throw the session away and start over with the welcome message.
    pub fn reset(&mut self) {
        tracing::info!(
            phase = %self.state().phase(),
            entries = self.transcript().len(),
            "resetting session"
        );
        self.session = Session::new(prompts::WELCOME_MESSAGE);
        self.pending_images.clear();
    }

    /// Process one student reply.
    ///
    /// Validation and session-state problems are returned as errors and leave
    /// the session untouched. Gateway problems are absorbed into the
    /// transcript and reported through [`TurnOutcome`].
    pub async fn submit_reply(&mut self, reply: &str) -> Result<TurnOutcome, CoachError> {
        let state = self.state();
        let (phase, iteration, topic) = (state.phase(), state.iteration(), state.selected_topic());
        if phase == Phase::Completed {
            return Err(CoachError::SessionCompleted);
        }
        if state.awaiting_topic() {
            return Err(CoachError::TopicRequired { phase });
        }
        let reply = self.validate(reply)?;

        if self.report_missing_configuration() {
            return Ok(TurnOutcome::NotConfigured);
        }

        self.session.push_user(reply);
        let instruction = prompts::turn_instruction(phase, iteration, topic, reply);
        let images = std::mem::take(&mut self.pending_images);

        match self.gateway.generate(&instruction, &images).await {
            Ok(response) => {
                self.session.push_assistant(response);
                let advance = self.session.state_mut().advance(reply);
                match advance {
                    Advance::Entered(next) => {
                        tracing::info!(from = %phase, to = %next, "phase transition");
                        if next == Phase::Completed {
                            self.session.push_assistant(prompts::CLOSING_MESSAGE);
                        }
                    }
                    Advance::Stayed => tracing::debug!(
                        %phase,
                        iteration = self.state().iteration(),
                        "turn completed"
                    ),
                }
                Ok(TurnOutcome::Answered(advance))
            }
            Err(e) => {
                tracing::warn!(error = %e, %phase, iteration, "model gateway failed, turn voided");
                self.session.push_assistant(prompts::APOLOGY_MESSAGE);
                self.pending_images = images;
                Ok(TurnOutcome::Apologized)
            }
        }
    }

    /// Choose the deepening topic by id and generate its opening question.
    pub async fn select_topic(&mut self, id: &str) -> SelectionOutcome {
        let Some(topic) = Topic::from_id(id) else {
            tracing::debug!(id, "ignoring unknown topic");
            return SelectionOutcome::UnknownTopic;
        };

        let state = self.state();
        if let Some(current) = state.selected_topic() {
            return SelectionOutcome::AlreadySelected(current);
        }
        if !state.awaiting_topic() {
            return SelectionOutcome::NotAvailable(state.phase());
        }

        if self.report_missing_configuration() {
            return SelectionOutcome::NotConfigured;
        }

        self.session.state_mut().choose_topic(topic);
        self.session.push_user(prompts::topic_choice_message(topic));
        tracing::info!(%topic, "topic selected");

        let instruction = prompts::topic_opening_instruction(topic);
        match self.gateway.generate(&instruction, &[]).await {
            Ok(question) => {
                self.session.push_assistant(question);
                SelectionOutcome::Opened(topic)
            }
            Err(e) => {
                tracing::warn!(error = %e, %topic, "opening question failed");
                self.session.push_assistant(prompts::APOLOGY_MESSAGE);
                SelectionOutcome::OpenedWithApology(topic)
            }
        }
    }

    fn validate<'a>(&self, reply: &'a str) -> Result<&'a str, CoachError> {
        let reply = reply.trim();
        if reply.is_empty() {
            tracing::debug!("rejecting empty reply");
            return Err(CoachError::EmptyReply);
        }
        let len = reply.chars().count();
        if len > self.config.max_reply_chars {
            tracing::debug!(len, max = self.config.max_reply_chars, "rejecting oversized reply");
            return Err(CoachError::ReplyTooLong {
                len,
                max: self.config.max_reply_chars,
            });
        }
        Ok(reply)
    }

    /// Record the configuration hint if the gateway has no credential.
    fn report_missing_configuration(&mut self) -> bool {
        match self.gateway.check_configured() {
            Ok(()) => false,
            Err(e) => {
                tracing::error!(error = %e, "model gateway is not configured");
                self.session
                    .push_assistant(prompts::MISSING_CONFIGURATION_MESSAGE);
                true
            }
        }
    }
}
