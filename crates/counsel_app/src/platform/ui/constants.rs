pub const PAGE_TITLE: &str = "Indian Legal Assistant";
pub const INPUT_PLACEHOLDER: &str = "Enter your legal query:";
pub const LOADING_TEXT: &str = "typing...";
pub const ASSISTANT_NAME: &str = "Momos";
pub const SESSION_COOKIE: &str = "counsel_session";
pub const AVATAR_PATH: &str = "/avatar.svg";
pub const CHAT_PATH: &str = "/chat";

/// Scales of justice on a round badge.
pub const AVATAR_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64" width="64" height="64">
<circle cx="32" cy="32" r="31" fill="#1f3a5f"/>
<g stroke="#f2c14e" stroke-width="2.5" fill="none" stroke-linecap="round">
<line x1="32" y1="14" x2="32" y2="48"/>
<line x1="18" y1="20" x2="46" y2="20"/>
<line x1="24" y1="48" x2="40" y2="48"/>
<path d="M18 20 L12 34 M18 20 L24 34"/>
<path d="M46 20 L40 34 M46 20 L52 34"/>
<path d="M11 34 Q18 41 25 34"/>
<path d="M39 34 Q46 41 53 34"/>
</g>
</svg>"##;
