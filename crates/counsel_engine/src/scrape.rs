use std::sync::LazyLock;

use chardetng::EncodingDetector;
use ego_tree::NodeRef;
use encoding_rs::Encoding;
use engine_logging::{engine_info, engine_warn};
use regex::Regex;
use scraper::{node::Node, Html, Selector};

use crate::fetch::Fetcher;
use crate::{FetchError, ScrapedPage, NO_CONTENT, NO_TITLE};

/// Elements whose content never counts as article text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "img", "input"];

/// The HTML5 parser always synthesises a `<body>`, so presence is decided on
/// the source markup.
static BODY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body[\s>/]").expect("valid body tag pattern"));

/// Source regions where a literal `<body` is not a tag.
static NON_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script\b.*?</script\s*>|<style\b.*?</style\s*>")
        .expect("valid non-markup pattern")
});

/// Fetches one article and turns it into plain text.
pub struct PageScraper<F: Fetcher> {
    fetcher: F,
}

impl<F: Fetcher> PageScraper<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Single attempt: any fetch failure is returned as-is.
    pub async fn scrape(&self, url: &str) -> Result<ScrapedPage, FetchError> {
        let output = self.fetcher.fetch(url).await?;
        let html = decode_html(&output.bytes, output.metadata.content_type.as_deref());
        let page = extract_page(url, &html);
        engine_info!(
            "Scraped url={} title={:?} text_chars={} links={}",
            url,
            page.title,
            page.text.chars().count(),
            page.links.len()
        );
        Ok(page)
    }
}

/// Decode raw bytes into UTF-8 using: BOM -> Content-Type charset -> chardetng fallback.
///
/// Malformed sequences are replaced rather than rejected; scraped pages are
/// frequently sloppy about their declared charset.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        encoding
    } else if let Some(enc) = content_type
        .and_then(extract_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        enc
    } else {
        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        detector.guess(None, true)
    };

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        engine_warn!("Replaced malformed {} sequences while decoding", encoding.name());
    }
    text.into_owned()
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
    })
}

/// Pulls the title, visible body text and anchor targets out of `html`.
///
/// Body text is every non-blank text node outside `script`/`style`/`img`/`input`,
/// trimmed and joined with `\n`.
pub fn extract_page(url: &str, html: &str) -> ScrapedPage {
    let doc = Html::parse_document(html);
    let title_sel = Selector::parse("title").ok();
    let body_sel = Selector::parse("body").ok();
    let anchor_sel = Selector::parse("a").ok();

    let title = title_sel
        .as_ref()
        .and_then(|sel| doc.select(sel).next())
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let body = body_sel
        .as_ref()
        .filter(|_| has_body_tag(html))
        .and_then(|sel| doc.select(sel).next());
    let text = match body {
        Some(body) => {
            let mut lines = Vec::new();
            collect_text(*body, &mut lines);
            lines.join("\n")
        }
        None => NO_CONTENT.to_string(),
    };

    let links = anchor_sel
        .as_ref()
        .map(|sel| {
            doc.select(sel)
                .filter_map(|a| a.value().attr("href"))
                .filter(|href| !href.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default();

    ScrapedPage {
        url: url.to_string(),
        title,
        text,
        links,
    }
}

fn has_body_tag(html: &str) -> bool {
    BODY_TAG.is_match(&NON_MARKUP.replace_all(html, ""))
}

fn collect_text(node: NodeRef<'_, Node>, lines: &mut Vec<String>) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    lines.push(trimmed.to_string());
                }
            }
            Node::Element(element) if element.name().eq_ignore_ascii_case("noscript") => {
                collect_noscript(child, lines);
            }
            Node::Element(element) => {
                let skipped = SKIPPED_TAGS
                    .iter()
                    .any(|tag| element.name().eq_ignore_ascii_case(tag));
                if !skipped {
                    collect_text(child, lines);
                }
            }
            _ => {}
        }
    }
}

/// With scripting enabled the parser keeps `<noscript>` content as raw
/// markup, so it is parsed again as a fragment before collecting text.
fn collect_noscript(node: NodeRef<'_, Node>, lines: &mut Vec<String>) {
    for child in node.children() {
        match child.value() {
            Node::Text(raw) => {
                let fragment = Html::parse_fragment(raw);
                collect_text(*fragment.root_element(), lines);
            }
            Node::Element(_) => collect_text(child, lines),
            _ => {}
        }
    }
}
