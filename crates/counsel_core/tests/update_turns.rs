use std::sync::Once;

use counsel_core::{update, ChatState, Effect, Msg, TurnStage, GREETING};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn submit(state: ChatState, text: &str) -> (ChatState, Vec<Effect>) {
    update(state, Msg::MessageSubmitted(text.to_string()))
}

/// Drives one turn through search, scrape and summarize with the given answer.
fn run_successful_turn(state: ChatState, question: &str, answer: &str) -> ChatState {
    let (state, effects) = submit(state, question);
    let turn_id = effects[0].turn_id();
    let (state, _) = update(
        state,
        Msg::ArticleFound {
            turn_id,
            url: "https://example.in/theft".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::PageScraped {
            turn_id,
            text: "Section 379".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::AnswerReady {
            turn_id,
            answer: answer.to_string(),
        },
    );
    state
}

#[test]
fn new_session_is_seeded_with_greeting() {
    init_logging();
    let state = ChatState::new();

    assert_eq!(state.responses(), &[GREETING.to_string()]);
    assert!(state.requests().is_empty());
    assert!(!state.is_busy());
}

#[test]
fn submit_trims_and_starts_search() {
    init_logging();
    let (state, effects) = submit(ChatState::new(), "  What is the punishment for theft?  ");

    assert_eq!(
        effects,
        vec![Effect::SearchArticle {
            turn_id: 1,
            question: "What is the punishment for theft?".to_string(),
        }]
    );
    assert!(state.is_busy());
    assert_eq!(state.pending_stage(), Some(TurnStage::Searching));
    // Nothing is appended until the answer arrives.
    assert!(state.requests().is_empty());
    assert_eq!(state.responses().len(), 1);
}

#[test]
fn blank_submission_is_ignored() {
    init_logging();
    let (state, effects) = submit(ChatState::new(), "   \n ");

    assert!(effects.is_empty());
    assert!(!state.is_busy());
    assert_eq!(state, ChatState::new());
}

#[test]
fn submission_while_busy_is_ignored() {
    init_logging();
    let (state, _) = submit(ChatState::new(), "first");
    let (state, effects) = submit(state, "second");

    assert!(effects.is_empty());
    assert!(state.is_busy());
}

#[test]
fn full_turn_walks_stages_and_appends_pair() {
    init_logging();
    let (state, effects) = submit(ChatState::new(), "What is the punishment for theft?");
    let turn_id = effects[0].turn_id();

    let (state, effects) = update(
        state,
        Msg::ArticleFound {
            turn_id,
            url: "https://example.in/ipc-379".to_string(),
        },
    );
    assert_eq!(state.pending_stage(), Some(TurnStage::Scraping));
    assert_eq!(
        effects,
        vec![Effect::ScrapePage {
            turn_id,
            url: "https://example.in/ipc-379".to_string(),
        }]
    );

    let (state, effects) = update(
        state,
        Msg::PageScraped {
            turn_id,
            text: "Whoever commits theft shall be punished".to_string(),
        },
    );
    assert_eq!(state.pending_stage(), Some(TurnStage::Summarizing));
    assert_eq!(
        effects,
        vec![Effect::Summarize {
            turn_id,
            question: "What is the punishment for theft?".to_string(),
            article_text: "Whoever commits theft shall be punished".to_string(),
        }]
    );

    let (state, effects) = update(
        state,
        Msg::AnswerReady {
            turn_id,
            answer: "Up to three years in prison.".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.is_busy());
    assert_eq!(
        state.requests(),
        &["What is the punishment for theft?".to_string()]
    );
    assert_eq!(
        state.responses(),
        &[
            GREETING.to_string(),
            "Up to three years in prison.".to_string()
        ]
    );
}

#[test]
fn missing_article_aborts_without_touching_history() {
    init_logging();
    let state = run_successful_turn(ChatState::new(), "q1", "a1");
    let before_requests = state.requests().to_vec();
    let before_responses = state.responses().to_vec();

    let (state, effects) = submit(state, "q2");
    let turn_id = effects[0].turn_id();
    let (state, effects) = update(state, Msg::ArticleMissing { turn_id });

    assert!(effects.is_empty());
    assert!(!state.is_busy());
    assert_eq!(state.requests(), before_requests.as_slice());
    assert_eq!(state.responses(), before_responses.as_slice());
    assert_eq!(
        state.view().notice.as_deref(),
        Some("No relevant articles found. Try a different query.")
    );
}

#[test]
fn scrape_failure_reports_reason() {
    init_logging();
    let (state, effects) = submit(ChatState::new(), "q");
    let turn_id = effects[0].turn_id();
    let (state, _) = update(
        state,
        Msg::ArticleFound {
            turn_id,
            url: "https://example.in".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::ScrapeFailed {
            turn_id,
            reason: "Failed to fetch webpage. Status Code: 403".to_string(),
        },
    );

    assert!(state.requests().is_empty());
    assert_eq!(
        state.view().notice.as_deref(),
        Some("Failed to extract content: Failed to fetch webpage. Status Code: 403")
    );
}

#[test]
fn empty_generation_and_blank_answer_both_report_no_results() {
    init_logging();
    let (state, effects) = submit(ChatState::new(), "q");
    let turn_id = effects[0].turn_id();
    let (state, _) = update(state, Msg::GenerationEmpty { turn_id });
    assert_eq!(
        state.view().notice.as_deref(),
        Some("No results were generated. Please try again.")
    );

    let (state, effects) = submit(state, "q");
    let turn_id = effects[0].turn_id();
    let (state, _) = update(
        state,
        Msg::AnswerReady {
            turn_id,
            answer: "  ".to_string(),
        },
    );
    assert!(state.requests().is_empty());
    assert_eq!(
        state.view().notice.as_deref(),
        Some("No results were generated. Please try again.")
    );
}

#[test]
fn new_submission_clears_previous_notice() {
    init_logging();
    let (state, effects) = submit(ChatState::new(), "q");
    let turn_id = effects[0].turn_id();
    let (state, _) = update(state, Msg::ArticleMissing { turn_id });
    assert!(state.notice().is_some());

    let (state, _) = submit(state, "again");
    assert!(state.notice().is_none());
}

#[test]
fn notice_shown_clears_notice() {
    init_logging();
    let (state, effects) = submit(ChatState::new(), "q");
    let turn_id = effects[0].turn_id();
    let (state, _) = update(
        state,
        Msg::TurnFailed {
            turn_id,
            reason: "backend down".to_string(),
        },
    );
    assert_eq!(
        state.view().notice.as_deref(),
        Some("An error occurred: backend down")
    );

    let (state, _) = update(state, Msg::NoticeShown);
    assert!(state.notice().is_none());
}

#[test]
fn notice_shown_without_notice_changes_nothing() {
    init_logging();
    let state = ChatState::new();
    let (next, effects) = update(state.clone(), Msg::NoticeShown);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn stale_outcomes_are_ignored() {
    init_logging();
    let (state, effects) = submit(ChatState::new(), "q1");
    let first = effects[0].turn_id();
    let (state, _) = update(state, Msg::ArticleMissing { turn_id: first });

    let (state, effects) = submit(state, "q2");
    let second = effects[0].turn_id();
    assert_ne!(first, second);

    let (state, effects) = update(
        state,
        Msg::ArticleFound {
            turn_id: first,
            url: "https://late.example".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.pending_stage(), Some(TurnStage::Searching));

    let (state, _) = update(
        state,
        Msg::AnswerReady {
            turn_id: first,
            answer: "late".to_string(),
        },
    );
    assert!(state.requests().is_empty());
    assert!(state.is_busy());
}
