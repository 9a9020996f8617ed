//! Counsel engine: the IO side of a chat turn (search, scrape, agent).
pub mod agent;
mod engine;
mod fetch;
mod scrape;
mod search;
mod types;

pub use agent::{AgentError, LlmConfig};
pub use engine::{ArticleSearch, Engine, EngineSettings, PageSource, Summarizer};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use scrape::{decode_html, extract_page, PageScraper};
pub use search::{
    first_non_pdf_link, ArticleFinder, SearchError, SearchSettings, JURISDICTION_QUALIFIER,
    SERPAPI_ENDPOINT,
};
pub use types::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, ScrapedPage, NO_CONTENT, NO_TITLE,
};
