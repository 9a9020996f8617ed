use std::collections::VecDeque;

use counsel_core::{Effect, Msg};
use counsel_engine::{AgentError, Engine};
use engine_logging::{engine_info, engine_warn};

use super::session::{SessionId, SessionStore};

/// Executes core effects against the engine and reports each outcome as a `Msg`.
#[derive(Clone)]
pub struct EffectRunner {
    engine: Engine,
}

impl EffectRunner {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub async fn run(&self, effect: Effect) -> Msg {
        match effect {
            Effect::SearchArticle { turn_id, question } => {
                engine_info!("turn={} searching", turn_id);
                match self.engine.find_article(&question).await {
                    Some(url) => Msg::ArticleFound { turn_id, url },
                    None => Msg::ArticleMissing { turn_id },
                }
            }
            Effect::ScrapePage { turn_id, url } => {
                engine_info!("turn={} scraping {}", turn_id, url);
                match self.engine.scrape(&url).await {
                    Ok(page) => Msg::PageScraped {
                        turn_id,
                        text: page.text,
                    },
                    Err(err) => {
                        engine_warn!("turn={} scrape failed: {}", turn_id, err);
                        Msg::ScrapeFailed {
                            turn_id,
                            reason: err.user_message(),
                        }
                    }
                }
            }
            Effect::Summarize {
                turn_id,
                question,
                article_text,
            } => {
                engine_info!("turn={} summarizing", turn_id);
                match self.engine.answer(&question, &article_text).await {
                    Ok(answer) => Msg::AnswerReady { turn_id, answer },
                    Err(AgentError::EmptyGeneration) => Msg::GenerationEmpty { turn_id },
                    Err(err) => {
                        engine_warn!("turn={} agent failed: {}", turn_id, err);
                        Msg::TurnFailed {
                            turn_id,
                            reason: err.to_string(),
                        }
                    }
                }
            }
        }
    }

    /// Runs effects one at a time, feeding each outcome back into the session,
    /// until the turn produces no further work.
    pub async fn drive(&self, sessions: &SessionStore, id: SessionId, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            let msg = self.run(effect).await;
            queue.extend(sessions.dispatch(id, msg));
        }
    }
}
