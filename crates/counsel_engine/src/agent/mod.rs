//! Two-role agent exchange on top of a chat-completion backend.
//!
//! A [`UserProxyAgent`] hands a task to an [`AssistantAgent`]; the proxy never
//! asks a human and never executes code, so the exchange ends as soon as the
//! proxy sees a reply it treats as terminating.
mod backend;
mod conversation;
mod summarize;

pub use backend::{ChatMessage, LlmBackend, LlmConfig, OpenAiBackend, Role, OPENAI_ENDPOINT};
pub use conversation::{initiate_chats, AssistantAgent, ChatRequest, ChatResult, UserProxyAgent};
pub use summarize::{
    build_legal_task, final_answer, strip_termination, SummarizationAgent, TERMINATION_MARKER,
};

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("LLM backend returned {status}: {body}")]
    Backend { status: u16, body: String },
    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("no results were generated")]
    EmptyGeneration,
}
