#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Stable per-entry key, e.g. `"0_assistant"` or `"0_user"`.
    pub key: String,
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatViewModel {
    pub transcript: Vec<TranscriptEntry>,
    pub busy: bool,
    pub notice: Option<String>,
}
