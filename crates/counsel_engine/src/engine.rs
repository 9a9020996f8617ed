use std::sync::Arc;

use crate::agent::{AgentError, LlmConfig, OpenAiBackend, SummarizationAgent};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::scrape::PageScraper;
use crate::search::{ArticleFinder, SearchSettings};
use crate::{FetchError, ScrapedPage};

#[async_trait::async_trait]
pub trait ArticleSearch: Send + Sync {
    async fn find_article(&self, question: &str) -> Option<String>;
}

#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, FetchError>;
}

#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn answer(&self, question: &str, article_text: &str) -> Result<String, AgentError>;
}

#[async_trait::async_trait]
impl ArticleSearch for ArticleFinder {
    async fn find_article(&self, question: &str) -> Option<String> {
        ArticleFinder::find_article(self, question).await
    }
}

#[async_trait::async_trait]
impl<F: Fetcher + 'static> PageSource for PageScraper<F> {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, FetchError> {
        PageScraper::scrape(self, url).await
    }
}

#[async_trait::async_trait]
impl Summarizer for SummarizationAgent {
    async fn answer(&self, question: &str, article_text: &str) -> Result<String, AgentError> {
        SummarizationAgent::answer(self, question, article_text).await
    }
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub search: SearchSettings,
    pub fetch: FetchSettings,
    pub llm: LlmConfig,
}

/// The three pipeline stages behind trait objects so callers can swap any of them.
#[derive(Clone)]
pub struct Engine {
    search: Arc<dyn ArticleSearch>,
    pages: Arc<dyn PageSource>,
    summarizer: Arc<dyn Summarizer>,
}

impl Engine {
    pub fn new(
        search: Arc<dyn ArticleSearch>,
        pages: Arc<dyn PageSource>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            search,
            pages,
            summarizer,
        }
    }

    pub fn from_settings(settings: EngineSettings) -> Result<Self, AgentError> {
        let backend = Arc::new(OpenAiBackend::new(settings.llm)?);
        Ok(Self::new(
            Arc::new(ArticleFinder::new(settings.search)),
            Arc::new(PageScraper::new(ReqwestFetcher::new(settings.fetch))),
            Arc::new(SummarizationAgent::new(backend)),
        ))
    }

    pub async fn find_article(&self, question: &str) -> Option<String> {
        self.search.find_article(question).await
    }

    pub async fn scrape(&self, url: &str) -> Result<ScrapedPage, FetchError> {
        self.pages.scrape(url).await
    }

    pub async fn answer(&self, question: &str, article_text: &str) -> Result<String, AgentError> {
        self.summarizer.answer(question, article_text).await
    }
}
