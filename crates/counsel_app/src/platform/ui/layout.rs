use super::constants::*;

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 760px; margin: 0 auto; padding: 24px; background: #fafafa; color: #222; }
h1 { border-bottom: 2px solid #1f3a5f; padding-bottom: 8px; }
.chat-history { display: flex; flex-direction: column; gap: 12px; margin-bottom: 96px; }
.msg { display: flex; gap: 10px; align-items: flex-start; }
.msg .bubble { padding: 10px 14px; border-radius: 12px; max-width: 85%; line-height: 1.45; }
.msg.assistant .bubble { background: #fff; border: 1px solid #ddd; }
.msg.user { flex-direction: row-reverse; }
.msg.user .bubble { background: #1f3a5f; color: #fff; white-space: pre-wrap; }
.avatar { width: 36px; height: 36px; border-radius: 50%; flex-shrink: 0; }
.avatar.user { background: #f2c14e; }
.notice { background: #fdecea; border: 1px solid #f5c2c0; color: #8a1c14; padding: 10px 14px; border-radius: 8px; margin-bottom: 12px; }
.typing { color: #666; font-style: italic; display: none; }
.typing.active { display: block; }
.chat-form { position: fixed; bottom: 0; left: 0; right: 0; background: #fafafa; padding: 16px; border-top: 1px solid #ddd; }
.chat-form input { width: 100%; max-width: 760px; display: block; margin: 0 auto; padding: 12px; font-size: 1rem; border-radius: 8px; border: 1px solid #bbb; box-sizing: border-box; }
"#;

const JS: &str = r#"
document.getElementById('chat-form').addEventListener('submit', function (ev) {
    var input = document.getElementById('chat-input');
    if (!input.value.trim()) { ev.preventDefault(); return; }
    document.getElementById('typing').classList.add('active');
    input.readOnly = true;
});
"#;

/// Wraps already-rendered transcript HTML in the chat page.
pub fn page(notice_html: &str, transcript_html: &str, busy: bool) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
    <h1>{title}</h1>
    {notice}
    <div id="chat-history" class="chat-history">
{transcript}
        <div id="typing" class="{typing_class}">{loading}</div>
    </div>
    <form id="chat-form" class="chat-form" method="post" action="{action}">
        <input id="chat-input" name="message" type="text" autocomplete="off" autofocus placeholder="{placeholder}">
    </form>
    <script>
{js}
    </script>
</body>
</html>"#,
        title = PAGE_TITLE,
        css = CSS,
        js = JS,
        notice = notice_html,
        transcript = transcript_html,
        typing_class = if busy { "typing active" } else { "typing" },
        loading = LOADING_TEXT,
        action = CHAT_PATH,
        placeholder = INPUT_PLACEHOLDER,
    )
}
