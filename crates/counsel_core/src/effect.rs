use crate::TurnId;

/// Side effects requested by [`crate::update`]; the app executes them and
/// reports the outcome back as a [`crate::Msg`] carrying the same `turn_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Look up one article for the user's question.
    SearchArticle { turn_id: TurnId, question: String },
    /// Download and extract the article text.
    ScrapePage { turn_id: TurnId, url: String },
    /// Ask the agent to answer `question` from `article_text`.
    Summarize {
        turn_id: TurnId,
        question: String,
        article_text: String,
    },
}

impl Effect {
    pub fn turn_id(&self) -> TurnId {
        match self {
            Effect::SearchArticle { turn_id, .. }
            | Effect::ScrapePage { turn_id, .. }
            | Effect::Summarize { turn_id, .. } => *turn_id,
        }
    }
}
