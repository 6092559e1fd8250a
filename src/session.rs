//! Session state for one reflection dialogue: the append-only transcript
//! plus the phase/iteration counters that drive it.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::topics::Topic;

/// Maximum number of turn-cycles per phase.
pub const ITERATIONS_PER_PHASE: u32 = 3;

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One immutable line of the transcript.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    role: Role,
    text: String,
    created_at: DateTime<Utc>,
}

impl TranscriptEntry {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Stage of the dialogue. Only ever moves forward, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Start,
    Deepening,
    Conclusion,
    Completed,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Deepening => "deepening",
            Self::Conclusion => "conclusion",
            Self::Completed => "completed",
        }
    }

    /// 1-based step number shown to the student. `Completed` counts as the
    /// last step.
    pub const fn step(self) -> u32 {
        match self {
            Self::Start => 1,
            Self::Deepening => 2,
            Self::Conclusion | Self::Completed => 3,
        }
    }

    /// Rough progress through the dialogue, in percent.
    pub const fn progress_percent(self) -> u8 {
        match self {
            Self::Start => 33,
            Self::Deepening => 66,
            Self::Conclusion | Self::Completed => 100,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of advancing the counters after a successful turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Still in the same phase, iteration incremented.
    Stayed,
    /// Moved to a new phase; iteration reset to 0.
    Entered(Phase),
}

/// Phase/iteration counters, the chosen topic and collected insights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    phase: Phase,
    iteration: u32,
    selected_topic: Option<Topic>,
    insights: Vec<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Start,
            iteration: 0,
            selected_topic: None,
            insights: Vec::new(),
        }
    }
}

impl SessionState {
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn iteration(&self) -> u32 {
        self.iteration
    }

    pub const fn selected_topic(&self) -> Option<Topic> {
        self.selected_topic
    }

    pub fn insights(&self) -> &[String] {
        &self.insights
    }

    /// True while the student still has to pick a deepening topic.
    pub const fn awaiting_topic(&self) -> bool {
        matches!(self.phase, Phase::Deepening) && self.selected_topic.is_none()
    }

    /// Apply the transition rule after an assistant response to `reply`.
    pub(crate) fn advance(&mut self, reply: &str) -> Advance {
        match self.phase {
            Phase::Start => self.count_iteration(Phase::Deepening),
            Phase::Deepening => self.count_iteration(Phase::Conclusion),
            Phase::Conclusion => {
                self.insights.push(reply.to_string());
                self.enter(Phase::Completed)
            }
            Phase::Completed => Advance::Stayed,
        }
    }

    fn count_iteration(&mut self, next: Phase) -> Advance {
        let iteration = self.iteration + 1;
        if iteration >= ITERATIONS_PER_PHASE {
            self.enter(next)
        } else {
            self.iteration = iteration;
            Advance::Stayed
        }
    }

    fn enter(&mut self, phase: Phase) -> Advance {
        debug_assert!(phase > self.phase);
        self.phase = phase;
        self.iteration = 0;
        Advance::Entered(phase)
    }

    /// Record the topic choice. Returns `false` and leaves state untouched
    /// when no choice is pending.
    pub(crate) fn choose_topic(&mut self, topic: Topic) -> bool {
        if !self.awaiting_topic() {
            return false;
        }
        self.selected_topic = Some(topic);
        self.iteration = 0;
        true
    }
}

/// One complete dialogue: transcript plus state, owned by the coach.
#[derive(Debug, Clone)]
pub struct Session {
    transcript: Vec<TranscriptEntry>,
    state: SessionState,
}

impl Session {
    /// Create a session whose transcript opens with `welcome`.
    pub fn new(welcome: &str) -> Self {
        Self {
            transcript: vec![TranscriptEntry::new(Role::Assistant, welcome)],
            state: SessionState::default(),
        }
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub(crate) fn push_user(&mut self, text: impl Into<String>) {
        self.transcript.push(TranscriptEntry::new(Role::User, text));
    }

    pub(crate) fn push_assistant(&mut self, text: impl Into<String>) {
        self.transcript
            .push(TranscriptEntry::new(Role::Assistant, text));
    }
}
