use std::fmt;

/// User-visible reason a turn was aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoArticle,
    ExtractFailed(String),
    NoResults,
    Failed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoArticle => write!(f, "No relevant articles found. Try a different query."),
            Notice::ExtractFailed(reason) => write!(f, "Failed to extract content: {reason}"),
            Notice::NoResults => write!(f, "No results were generated. Please try again."),
            Notice::Failed(reason) => write!(f, "An error occurred: {reason}"),
        }
    }
}
