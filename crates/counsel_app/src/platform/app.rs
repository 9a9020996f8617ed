use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use counsel_core::{ChatState, Msg};
use counsel_engine::Engine;
use engine_logging::{clip_for_log, engine_error, engine_info};
use serde::Deserialize;

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::session::{SessionId, SessionStore};
use super::ui;
use super::ui::constants::{AVATAR_PATH, AVATAR_SVG, CHAT_PATH, SESSION_COOKIE};

pub async fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::default());

    let config = AppConfig::load()?;
    let engine = Engine::from_settings(config.engine_settings())?;
    let shared = Arc::new(AppShared::new(EffectRunner::new(engine)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    engine_info!(
        "Serving on http://{} with model {}",
        listener.local_addr()?,
        config.model
    );

    axum::serve(listener, router(shared))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            engine_info!("Shutdown requested");
        })
        .await?;
    Ok(())
}

pub struct AppShared {
    sessions: SessionStore,
    runner: EffectRunner,
}

impl AppShared {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            sessions: SessionStore::new(),
            runner,
        }
    }

    fn known_session(&self, jar: &CookieJar) -> Option<SessionId> {
        let claimed = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| cookie.value().parse().ok());
        self.sessions.lookup(claimed)
    }

    /// Resolves the cookie to a live session, minting a new one if needed.
    fn session_or_create(&self, jar: CookieJar) -> (SessionId, CookieJar) {
        if let Some(id) = self.known_session(&jar) {
            return (id, jar);
        }

        let id = self.sessions.create();
        let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        (id, jar.add(cookie))
    }
}

pub fn router(shared: Arc<AppShared>) -> Router {
    Router::new()
        .route("/", get(index))
        .route(CHAT_PATH, post(submit))
        .route(AVATAR_PATH, get(avatar))
        .route("/health", get(health))
        .with_state(shared)
}

/// Visitors without a session see the greeting; nothing is stored for them.
async fn index(State(shared): State<Arc<AppShared>>, jar: CookieJar) -> Html<String> {
    let view = shared
        .known_session(&jar)
        .and_then(|id| {
            let view = shared.sessions.view(id)?;
            if view.notice.is_some() {
                shared.sessions.dispatch(id, Msg::NoticeShown);
            }
            Some(view)
        })
        .unwrap_or_else(|| ChatState::new().view());
    Html(ui::render::render(&view))
}

#[derive(Debug, Deserialize)]
struct ChatForm {
    #[serde(default)]
    message: String,
}

/// Runs the whole turn before answering; the browser shows its loading
/// indicator until the redirect back to `/` arrives.
async fn submit(
    State(shared): State<Arc<AppShared>>,
    jar: CookieJar,
    Form(form): Form<ChatForm>,
) -> impl IntoResponse {
    let (id, jar) = shared.session_or_create(jar);
    engine_info!(
        "session={} submitted {:?}",
        id,
        clip_for_log(form.message.trim(), 120)
    );

    let effects = shared.sessions.dispatch(id, Msg::MessageSubmitted(form.message));
    if let Some(turn_id) = effects.first().map(|effect| effect.turn_id()) {
        // Spawned so a closed browser tab cannot cancel the turn halfway.
        let task_shared = shared.clone();
        let turn = tokio::spawn(async move {
            task_shared
                .runner
                .drive(&task_shared.sessions, id, effects)
                .await;
        });
        if let Err(err) = turn.await {
            engine_error!("session={} turn={} aborted: {}", id, turn_id, err);
            shared.sessions.dispatch(
                id,
                Msg::TurnFailed {
                    turn_id,
                    reason: "the request was interrupted".to_string(),
                },
            );
        }
    }

    (jar, Redirect::to("/"))
}

async fn avatar() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], AVATAR_SVG)
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use counsel_engine::{Engine, EngineSettings, FetchSettings, LlmConfig, SearchSettings};
    use serde_json::json;
    use tower::ServiceExt;
    use uuid::Uuid;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{router, AppShared};
    use crate::platform::effects::EffectRunner;
    use crate::platform::ui::constants::SESSION_COOKIE;

    const ARTICLE_HTML: &str = "<html><head><title>IPC 379</title></head>\
        <body><p>Whoever commits theft shall be punished with imprisonment.</p></body></html>";

    fn shared_for(server: &MockServer) -> Arc<AppShared> {
        let mut search = SearchSettings::new("serp-test");
        search.endpoint = format!("{}/search", server.uri());
        let mut llm = LlmConfig::new("gpt-4o-mini", "sk-test");
        llm.endpoint = format!("{}/v1", server.uri());

        let engine = Engine::from_settings(EngineSettings {
            search,
            fetch: FetchSettings::default(),
            llm,
        })
        .expect("engine");
        Arc::new(AppShared::new(EffectRunner::new(engine)))
    }

    async fn mount_search(server: &MockServer, links: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "organic_results": links })),
            )
            .mount(server)
            .await;
    }

    fn set_cookie(response: &axum::response::Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| raw.split(';').next())
            .map(ToOwned::to_owned)
    }

    fn session_id(cookie: &str) -> Uuid {
        cookie
            .strip_prefix(&format!("{SESSION_COOKIE}="))
            .and_then(|value| value.parse().ok())
            .expect("session id")
    }

    async fn get_page(app: &Router, cookie: Option<&str>) -> (axum::response::Response, String) {
        let mut request = Request::get("/");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let response = app
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let (parts, body) = response.into_parts();
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        (axum::response::Response::from_parts(parts, Body::empty()), text)
    }

    /// Submits `message` and returns the session cookie to use afterwards.
    async fn post_message(app: &Router, cookie: Option<&str>, message: &str) -> String {
        let body = format!("message={}", message.replace(' ', "+").replace('?', "%3F"));
        let mut request = Request::post("/chat")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let response = app
            .clone()
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        set_cookie(&response)
            .or_else(|| cookie.map(ToOwned::to_owned))
            .expect("session cookie")
    }

    #[tokio::test]
    async fn first_visit_shows_greeting_without_storing_a_session() {
        let server = MockServer::start().await;
        let shared = shared_for(&server);
        let app = router(shared.clone());

        let (response, page) = get_page(&app, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(set_cookie(&response), None);
        assert!(page.contains(r#"id="0_assistant""#));
        assert!(page.contains("Welcome"));
        assert!(!page.contains(r#"id="0_user""#));
        assert_eq!(shared.sessions.len(), 0);
    }

    #[tokio::test]
    async fn cookieless_and_unknown_visits_do_not_grow_the_store() {
        let server = MockServer::start().await;
        let shared = shared_for(&server);
        let app = router(shared.clone());

        for _ in 0..50 {
            get_page(&app, None).await;
        }
        let forged = format!("{SESSION_COOKIE}={}", Uuid::new_v4());
        get_page(&app, Some(&forged)).await;
        get_page(&app, Some(&format!("{SESSION_COOKIE}=not-a-uuid"))).await;

        assert_eq!(shared.sessions.len(), 0);
    }

    #[tokio::test]
    async fn returning_visitor_keeps_the_same_session() {
        let server = MockServer::start().await;
        let shared = shared_for(&server);
        let app = router(shared.clone());

        let cookie = post_message(&app, None, " ").await;
        let again = post_message(&app, Some(&cookie), " ").await;
        let (response, _) = get_page(&app, Some(&cookie)).await;

        assert_eq!(cookie, again);
        assert_eq!(set_cookie(&response), None);
        assert_eq!(shared.sessions.len(), 1);
    }

    #[tokio::test]
    async fn full_turn_appends_question_and_answer() {
        let server = MockServer::start().await;
        mount_search(
            &server,
            json!([
                { "link": "https://indiacode.nic.in/ipc.pdf" },
                { "link": format!("{}/ipc-379", server.uri()) }
            ]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/ipc-379"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=utf-8")
                    .set_body_string(ARTICLE_HTML),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": {
                    "role": "assistant",
                    "content": "Theft is punishable with up to **three years**. TERMINATE"
                } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let shared = shared_for(&server);
        let app = router(shared.clone());

        let cookie = post_message(&app, None, "What is the punishment for theft?").await;
        let id = session_id(&cookie);

        let (requests, responses) = shared
            .sessions
            .with_state(id, |s| (s.requests().to_vec(), s.responses().to_vec()))
            .unwrap();
        assert_eq!(requests, vec!["What is the punishment for theft?".to_string()]);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[1], "Theft is punishable with up to **three years**.");

        let (_, page) = get_page(&app, Some(&cookie)).await;
        assert!(page.contains(r#"id="1_assistant""#));
        assert!(page.contains("<strong>three years</strong>"));
        assert!(!page.contains("TERMINATE"));
    }

    #[tokio::test]
    async fn missing_article_shows_notice_once_and_keeps_history() {
        let server = MockServer::start().await;
        mount_search(&server, json!([{ "link": "https://indiacode.nic.in/ipc.pdf" }])).await;

        let shared = shared_for(&server);
        let app = router(shared.clone());

        let cookie = post_message(&app, None, "theft").await;
        let id = session_id(&cookie);

        let history = shared
            .sessions
            .with_state(id, |s| (s.requests().len(), s.responses().len()))
            .unwrap();
        assert_eq!(history, (0, 1));

        let (_, page) = get_page(&app, Some(&cookie)).await;
        assert!(page.contains(&ammonia::clean_text(
            "No relevant articles found. Try a different query."
        )));

        let (_, again) = get_page(&app, Some(&cookie)).await;
        assert!(!again.contains(r#"class="notice""#));
    }

    #[tokio::test]
    async fn blocked_page_reports_status_code() {
        let server = MockServer::start().await;
        mount_search(&server, json!([{ "link": format!("{}/blocked", server.uri()) }])).await;
        Mock::given(method("GET"))
            .and(path("/blocked"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let app = router(shared_for(&server));

        let cookie = post_message(&app, None, "theft").await;

        let (_, page) = get_page(&app, Some(&cookie)).await;
        assert!(page.contains(&ammonia::clean_text(
            "Failed to extract content: Failed to fetch webpage. Status Code: 403"
        )));
        assert!(!page.contains(r#"id="0_user""#));
    }

    #[tokio::test]
    async fn blank_message_starts_no_turn() {
        let server = MockServer::start().await;
        let shared = shared_for(&server);
        let app = router(shared.clone());

        let cookie = post_message(&app, None, "   ").await;

        let busy = shared
            .sessions
            .with_state(session_id(&cookie), |s| (s.is_busy(), s.requests().len()))
            .unwrap();
        assert_eq!(busy, (false, 0));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn avatar_and_health_are_served() {
        let server = MockServer::start().await;
        let app = router(shared_for(&server));

        let avatar = app
            .clone()
            .oneshot(Request::get("/avatar.svg").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            avatar.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );

        let health = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = to_bytes(health.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }
}
