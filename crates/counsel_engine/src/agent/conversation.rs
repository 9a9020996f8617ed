use std::sync::Arc;

use engine_logging::{clip_for_log, engine_debug, engine_info};

use super::{AgentError, ChatMessage, LlmBackend, Role};

type TerminationCheck = Box<dyn Fn(&ChatMessage) -> bool + Send + Sync>;

/// LLM-backed agent that answers whatever it is sent.
pub struct AssistantAgent {
    name: String,
    system_message: String,
    backend: Arc<dyn LlmBackend>,
}

impl AssistantAgent {
    pub fn new(
        name: impl Into<String>,
        system_message: impl Into<String>,
        backend: Arc<dyn LlmBackend>,
    ) -> Self {
        Self {
            name: name.into(),
            system_message: system_message.into(),
            backend,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    async fn generate_reply(&self, history: &[ChatMessage]) -> Result<ChatMessage, AgentError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::new(Role::System, None, self.system_message.as_str()));
        messages.extend_from_slice(history);

        let content = self.backend.complete(&messages).await?;
        Ok(ChatMessage {
            role: Role::Assistant,
            name: Some(self.name.clone()),
            content,
        })
    }
}

/// Non-interactive stand-in for the human side of the exchange.
///
/// It never prompts for input and never runs code. After each assistant reply
/// it either stops (termination check, or auto-reply budget spent) or sends
/// its configured auto reply.
pub struct UserProxyAgent {
    name: String,
    is_termination_msg: TerminationCheck,
    auto_reply: Option<String>,
    max_consecutive_auto_reply: usize,
}

impl UserProxyAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_termination_msg: Box::new(|_| false),
            auto_reply: None,
            max_consecutive_auto_reply: 0,
        }
    }

    pub fn with_termination_check(
        mut self,
        check: impl Fn(&ChatMessage) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.is_termination_msg = Box::new(check);
        self
    }

    pub fn with_auto_reply(mut self, reply: impl Into<String>, max_consecutive: usize) -> Self {
        self.auto_reply = Some(reply.into());
        self.max_consecutive_auto_reply = max_consecutive;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn reply_to(&self, message: &ChatMessage, auto_replies_sent: usize) -> Option<ChatMessage> {
        if (self.is_termination_msg)(message) || auto_replies_sent >= self.max_consecutive_auto_reply
        {
            return None;
        }
        self.auto_reply
            .as_deref()
            .map(|reply| ChatMessage::new(Role::User, Some(&self.name), reply))
    }
}

/// One chat in a sequence passed to [`initiate_chats`].
pub struct ChatRequest<'a> {
    pub sender: &'a UserProxyAgent,
    pub recipient: &'a AssistantAgent,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResult {
    pub chat_history: Vec<ChatMessage>,
}

impl ChatResult {
    /// Content of the last message, if any.
    pub fn last_content(&self) -> Option<&str> {
        self.chat_history
            .last()
            .and_then(|message| message.content.as_deref())
    }
}

/// Runs each chat in order. Every chat after the first receives the previous
/// chats' final messages as carried-over context.
pub async fn initiate_chats(chats: Vec<ChatRequest<'_>>) -> Result<Vec<ChatResult>, AgentError> {
    let mut results: Vec<ChatResult> = Vec::with_capacity(chats.len());

    for chat in chats {
        let carryover: Vec<&str> = results.iter().filter_map(ChatResult::last_content).collect();
        let message = if carryover.is_empty() {
            chat.message
        } else {
            format!("{}\nContext: \n{}", chat.message, carryover.join("\n"))
        };

        engine_info!(
            "{} -> {}: starting chat ({} chars)",
            chat.sender.name(),
            chat.recipient.name(),
            message.chars().count()
        );
        let result = run_chat(chat.sender, chat.recipient, message).await?;
        results.push(result);
    }

    Ok(results)
}

async fn run_chat(
    sender: &UserProxyAgent,
    recipient: &AssistantAgent,
    message: String,
) -> Result<ChatResult, AgentError> {
    let mut history = vec![ChatMessage::new(Role::User, Some(sender.name()), message)];
    let mut auto_replies_sent = 0;

    loop {
        let reply = recipient.generate_reply(&history).await?;
        engine_debug!(
            "{}: {}",
            recipient.name(),
            clip_for_log(reply.content.as_deref().unwrap_or_default(), 200)
        );
        let next = sender.reply_to(&reply, auto_replies_sent);
        history.push(reply);

        match next {
            Some(auto_reply) => {
                auto_replies_sent += 1;
                history.push(auto_reply);
            }
            None => break,
        }
    }

    Ok(ChatResult {
        chat_history: history,
    })
}
