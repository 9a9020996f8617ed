#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a chat message.
    MessageSubmitted(String),
    /// Search produced a candidate article.
    ArticleFound { turn_id: crate::TurnId, url: String },
    /// Search failed or every result was filtered out.
    ArticleMissing { turn_id: crate::TurnId },
    /// Article text extracted.
    PageScraped {
        turn_id: crate::TurnId,
        text: String,
    },
    /// Download or extraction failed.
    ScrapeFailed {
        turn_id: crate::TurnId,
        reason: String,
    },
    /// Agent produced a cleaned answer.
    AnswerReady {
        turn_id: crate::TurnId,
        answer: String,
    },
    /// Agent exchange yielded nothing usable.
    GenerationEmpty { turn_id: crate::TurnId },
    /// Any other failure that ends the turn (agent backend, lost task).
    TurnFailed {
        turn_id: crate::TurnId,
        reason: String,
    },
    /// The pending notice has been shown to the user.
    NoticeShown,
}
