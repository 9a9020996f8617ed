use crate::view_model::{ChatViewModel, Speaker, TranscriptEntry};
use crate::Notice;

pub type TurnId = u64;

/// Seeded as `responses[0]`; it has no matching request.
pub const GREETING: &str =
    "Hi there! Welcome to Indian Legal Assistant. How can I assist you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Searching,
    Scraping,
    Summarizing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingTurn {
    pub(crate) id: TurnId,
    pub(crate) message: String,
    pub(crate) stage: TurnStage,
}

/// One browser session's chat history.
///
/// `requests` and `responses` only ever grow, and only together, so
/// `responses.len() == requests.len() + 1` holds between turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatState {
    requests: Vec<String>,
    responses: Vec<String>,
    pending: Option<PendingTurn>,
    next_turn_id: TurnId,
    notice: Option<Notice>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            responses: vec![GREETING.to_string()],
            pending: None,
            next_turn_id: 1,
            notice: None,
        }
    }
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_stage(&self) -> Option<TurnStage> {
        self.pending.as_ref().map(|turn| turn.stage)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn view(&self) -> ChatViewModel {
        let mut transcript = Vec::with_capacity(self.responses.len() + self.requests.len());
        for (i, response) in self.responses.iter().enumerate() {
            transcript.push(TranscriptEntry {
                key: format!("{i}_assistant"),
                speaker: Speaker::Assistant,
                text: response.clone(),
            });
            if let Some(request) = self.requests.get(i) {
                transcript.push(TranscriptEntry {
                    key: format!("{i}_user"),
                    speaker: Speaker::User,
                    text: request.clone(),
                });
            }
        }

        ChatViewModel {
            transcript,
            busy: self.is_busy(),
            notice: self.notice.as_ref().map(ToString::to_string),
        }
    }

    pub(crate) fn begin_turn(&mut self, message: String) -> TurnId {
        let id = self.next_turn_id;
        self.next_turn_id += 1;
        self.pending = Some(PendingTurn {
            id,
            message,
            stage: TurnStage::Searching,
        });
        self.notice = None;
        id
    }

    /// Returns the pending turn only if `turn_id` is the one in flight.
    pub(crate) fn pending_turn(&self, turn_id: TurnId) -> Option<&PendingTurn> {
        self.pending.as_ref().filter(|turn| turn.id == turn_id)
    }

    pub(crate) fn advance_turn(&mut self, turn_id: TurnId, stage: TurnStage) {
        if let Some(turn) = self.pending.as_mut().filter(|turn| turn.id == turn_id) {
            turn.stage = stage;
        }
    }

    pub(crate) fn complete_turn(&mut self, turn_id: TurnId, answer: String) {
        if let Some(turn) = self.take_pending(turn_id) {
            self.requests.push(turn.message);
            self.responses.push(answer);
        }
    }

    pub(crate) fn abort_turn(&mut self, turn_id: TurnId, notice: Notice) {
        if self.take_pending(turn_id).is_some() {
            self.notice = Some(notice);
        }
    }

    pub(crate) fn clear_notice(&mut self) {
        self.notice = None;
    }

    fn take_pending(&mut self, turn_id: TurnId) -> Option<PendingTurn> {
        if self.pending.as_ref().is_some_and(|turn| turn.id == turn_id) {
            self.pending.take()
        } else {
            None
        }
    }
}
