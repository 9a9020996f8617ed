use crate::{ChatState, Effect, Msg, Notice, TurnStage};

/// Pure update function: applies a message to state and returns any effects.
///
/// Outcome messages for a turn other than the one in flight are dropped, so a
/// late reply can never append to the history.
pub fn update(mut state: ChatState, msg: Msg) -> (ChatState, Vec<Effect>) {
    let effects = match msg {
        Msg::MessageSubmitted(raw) => {
            let question = raw.trim();
            if question.is_empty() || state.is_busy() {
                return (state, Vec::new());
            }
            let question = question.to_string();
            let turn_id = state.begin_turn(question.clone());
            vec![Effect::SearchArticle { turn_id, question }]
        }
        Msg::ArticleFound { turn_id, url } => {
            if state.pending_turn(turn_id).is_none() {
                return (state, Vec::new());
            }
            state.advance_turn(turn_id, TurnStage::Scraping);
            vec![Effect::ScrapePage { turn_id, url }]
        }
        Msg::ArticleMissing { turn_id } => {
            state.abort_turn(turn_id, Notice::NoArticle);
            Vec::new()
        }
        Msg::PageScraped { turn_id, text } => {
            let Some(question) = state.pending_turn(turn_id).map(|turn| turn.message.clone())
            else {
                return (state, Vec::new());
            };
            state.advance_turn(turn_id, TurnStage::Summarizing);
            vec![Effect::Summarize {
                turn_id,
                question,
                article_text: text,
            }]
        }
        Msg::ScrapeFailed { turn_id, reason } => {
            state.abort_turn(turn_id, Notice::ExtractFailed(reason));
            Vec::new()
        }
        Msg::AnswerReady { turn_id, answer } => {
            if answer.trim().is_empty() {
                state.abort_turn(turn_id, Notice::NoResults);
            } else {
                state.complete_turn(turn_id, answer);
            }
            Vec::new()
        }
        Msg::GenerationEmpty { turn_id } => {
            state.abort_turn(turn_id, Notice::NoResults);
            Vec::new()
        }
        Msg::TurnFailed { turn_id, reason } => {
            state.abort_turn(turn_id, Notice::Failed(reason));
            Vec::new()
        }
        Msg::NoticeShown => {
            state.clear_notice();
            Vec::new()
        }
    };

    (state, effects)
}
