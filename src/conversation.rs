use log::{error, warn};
use std::sync::Arc;

use crate::models::chat::{Conversation, Sender};
use crate::relay::{Relay, RelayError};

pub const WELCOME_MESSAGE: &str =
    "Hello! I'm Claude, an AI assistant by Anthropic. I can help with a wide range of tasks \
     like answering questions, creative writing, coding assistance, and more. What would you \
     like to discuss today?";

/// Shown in the transcript in place of any relay failure; the real cause is
/// only logged.
pub const APOLOGY_MESSAGE: &str =
    "I'm sorry, there was an error processing your request. Please try again later.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    AwaitingResponse,
}

/// Owns the session transcript and serializes turns: `submit` opens a turn
/// and rejects anything while one is in flight, `resolve` closes it. The
/// transcript is append-only and a turn's user message always immediately
/// precedes its assistant (or apology) message.
pub struct ConversationController {
    relay: Arc<dyn Relay>,
    conversation: Conversation,
    state: ControllerState,
}

impl ConversationController {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        let mut conversation = Conversation::new();
        conversation.push(Sender::Assistant, WELCOME_MESSAGE);
        Self {
            relay,
            conversation,
            state: ControllerState::Idle,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Appends the user message and enters `AwaitingResponse`. Returns false
    /// without touching the transcript when a turn is already in flight or
    /// the text is blank.
    pub fn submit(&mut self, text: &str) -> bool {
        if self.state == ControllerState::AwaitingResponse {
            warn!("Submission rejected: a relay call is already in flight");
            return false;
        }
        if text.trim().is_empty() {
            return false;
        }
        self.conversation.push(Sender::User, text);
        self.state = ControllerState::AwaitingResponse;
        true
    }

    /// Closes the turn opened by `submit`: appends the assistant text, or
    /// the fixed apology on failure, and returns to `Idle`.
    pub fn resolve(&mut self, result: Result<String, RelayError>) {
        if self.state != ControllerState::AwaitingResponse {
            warn!("Resolve called with no turn in flight; ignoring");
            return;
        }
        match result {
            Ok(text) => {
                self.conversation.push(Sender::Assistant, text);
            }
            Err(e) => {
                error!("Relay call failed: {}", e);
                self.conversation.push(Sender::Assistant, APOLOGY_MESSAGE);
            }
        }
        self.state = ControllerState::Idle;
    }

    /// Runs one full turn against the relay. Returns whether the submission
    /// was accepted; the relay outcome lands in the transcript either way.
    pub async fn send(&mut self, text: &str) -> bool {
        if !self.submit(text) {
            return false;
        }
        let result = self.relay.forward(text).await;
        self.resolve(result);
        true
    }
}
