use std::sync::{Arc, LazyLock};

use engine_logging::{engine_info, engine_warn};
use regex::Regex;

use super::{
    initiate_chats, AgentError, AssistantAgent, ChatRequest, ChatResult, LlmBackend,
    UserProxyAgent,
};

/// Literal the assistant appends once it considers the task done.
pub const TERMINATION_MARKER: &str = "TERMINATE";

static TRAILING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*TERMINATE\s*$").expect("valid termination pattern"));

const ASSISTANT_SYSTEM_MESSAGE: &str = "You are a helpful AI assistant. \
Solve tasks using your language skills. \
Reply \"TERMINATE\" in the end when everything is done.";

/// Builds the single prompt sent to the assistant for one question.
pub fn build_legal_task(question: &str, article_text: &str) -> String {
    format!(
        "Read the following legal text and provide a natural, easy-to-understand response to the query: \"{question}\".\n\
         Make sure the explanation is clear and conversational, like how a legal expert would explain it to a non-lawyer. \
         Avoid robotic or overly formal language.\n\n\
         Here is the legal text:\n\n\
         {article_text}\n"
    )
}

/// Removes one trailing termination marker and the whitespace around it.
pub fn strip_termination(content: &str) -> String {
    TRAILING_MARKER.replace(content, "").into_owned()
}

/// Cleaned content of the last message of the last chat.
pub fn final_answer(results: &[ChatResult]) -> Result<String, AgentError> {
    let content = results
        .last()
        .and_then(ChatResult::last_content)
        .ok_or(AgentError::EmptyGeneration)?;

    let answer = strip_termination(content);
    if answer.trim().is_empty() {
        return Err(AgentError::EmptyGeneration);
    }
    Ok(answer)
}

/// Answers a legal question from one article via a proxy/assistant pair.
pub struct SummarizationAgent {
    assistant: AssistantAgent,
    proxy: UserProxyAgent,
}

impl SummarizationAgent {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        let assistant =
            AssistantAgent::new("summarization_agent", ASSISTANT_SYSTEM_MESSAGE, backend);
        // Any reply ends the exchange: exactly one assistant turn per question.
        let proxy = UserProxyAgent::new("User_Proxy_Auto").with_termination_check(|_| true);
        Self { assistant, proxy }
    }

    pub async fn answer(&self, question: &str, article_text: &str) -> Result<String, AgentError> {
        let task = build_legal_task(question, article_text);
        let results = initiate_chats(vec![ChatRequest {
            sender: &self.proxy,
            recipient: &self.assistant,
            message: task,
        }])
        .await?;

        match final_answer(&results) {
            Ok(answer) => {
                engine_info!("Generated answer ({} chars)", answer.chars().count());
                Ok(answer)
            }
            Err(err) => {
                engine_warn!("Agent exchange produced no usable content");
                Err(err)
            }
        }
    }
}
