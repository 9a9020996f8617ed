use counsel_core::{ChatViewModel, Speaker, TranscriptEntry};
use pulldown_cmark::{html, Options, Parser};

use super::constants::*;
use super::layout;

/// Renders the whole chat page for one session.
pub fn render(view: &ChatViewModel) -> String {
    let notice_html = view
        .notice
        .as_deref()
        .map(|text| {
            format!(
                r#"<div class="notice" role="alert">{}</div>"#,
                ammonia::clean_text(text)
            )
        })
        .unwrap_or_default();

    layout::page(&notice_html, &render_transcript(view), view.busy)
}

/// Responses and requests in index order, each tagged with its speaker.
pub fn render_transcript(view: &ChatViewModel) -> String {
    view.transcript
        .iter()
        .map(render_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_entry(entry: &TranscriptEntry) -> String {
    match entry.speaker {
        Speaker::Assistant => format!(
            r#"        <div class="msg assistant" id="{key}"><img class="avatar" src="{avatar}" alt="{name}"><div class="bubble">{body}</div></div>"#,
            key = entry.key,
            avatar = AVATAR_PATH,
            name = ASSISTANT_NAME,
            body = markdown_to_html(&entry.text),
        ),
        Speaker::User => format!(
            r#"        <div class="msg user" id="{key}"><div class="avatar user"></div><div class="bubble">{body}</div></div>"#,
            key = entry.key,
            body = ammonia::clean_text(&entry.text),
        ),
    }
}

/// Assistant replies are Markdown; the generated HTML is sanitized before use.
fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    ammonia::clean(&out)
}
