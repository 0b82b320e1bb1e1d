//! Axum server: page routes, fragment handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Form, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::AppState;
use crate::config::AppConfig;
use crate::gateway::{EmailDraft, GatewayClient, SmsDraft};
use crate::session::{Channel, Session, SessionStore};
use crate::ui::{self, StatusLine, Tab, Theme};

/// Cookie carrying the session ID.
pub const SESSION_COOKIE: &str = "courier_session";
/// Cookie carrying the theme preference.
pub const THEME_COOKIE: &str = "theme";

/// Interval between idle-session sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the server with the provided configuration.
pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    let settings = config.gateway.settings();
    info!(
        name: "gateway.config.loaded",
        base_url = %settings.base_url,
        "Gateway configuration loaded"
    );

    let state = AppState {
        gateway: Arc::new(GatewayClient::new(settings)),
        sessions: SessionStore::new(),
    };

    // Sweep idle sessions in the background.
    let sweeper = state.sessions.clone();
    let idle_timeout = Duration::from_secs(config.session.idle_timeout_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = sweeper.cleanup_idle(idle_timeout);
            if removed > 0 {
                debug!(removed, "swept idle sessions");
            }
        }
    });

    // A very large timeout stands in for "disabled" so the router type
    // stays the same either way.
    let timeout_duration = if config.resilience.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60)
    } else {
        Duration::from_secs(30)
    };

    let app = router(state).layer(axum::middleware::from_fn(
        move |req: Request, next: Next| {
            let duration = timeout_duration;
            async move {
                match tokio::time::timeout(duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            }
        },
    ));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/", get(chat_page))
        .route("/email", get(email_page).post(email_submit))
        .route("/sms", get(sms_page).post(sms_submit))
        // Fragments
        .route("/chat", post(chat_submit))
        .route("/theme/toggle", post(toggle_theme))
        // Static assets
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Session and theme plumbing
// ─────────────────────────────────────────────────────────────────────────────

/// Look up the session named by the cookie, or create one (and set the
/// cookie) when it is missing or has been swept.
fn resolve_session(state: &AppState, jar: CookieJar) -> (CookieJar, Session) {
    if let Some(cookie) = jar.get(SESSION_COOKIE)
        && let Some(session) = state.sessions.get(cookie.value())
    {
        return (jar, session);
    }

    let session = state.sessions.create();
    debug!(session_id = %session.id(), "created session");
    let cookie = Cookie::build((SESSION_COOKIE, session.id().to_string()))
        .path("/")
        .http_only(true)
        .build();
    (jar.add(cookie), session)
}

fn theme_from(jar: &CookieJar) -> Theme {
    Theme::from_cookie(jar.get(THEME_COOKIE).map(|c| c.value()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Page handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - chat page.
async fn chat_page(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let theme = theme_from(&jar);
    let (jar, session) = resolve_session(&state, jar);
    let content = ui::chat::panel(&session.entries());
    (jar, Html(ui::html_shell("Chat", theme, Tab::Chat, &content)))
}

/// GET /email - email page.
async fn email_page(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let theme = theme_from(&jar);
    let (jar, _session) = resolve_session(&state, jar);
    let content = ui::email::panel();
    (jar, Html(ui::html_shell("Email", theme, Tab::Email, &content)))
}

/// GET /sms - SMS page.
async fn sms_page(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let theme = theme_from(&jar);
    let (jar, _session) = resolve_session(&state, jar);
    let content = ui::sms::panel();
    (jar, Html(ui::html_shell("SMS", theme, Tab::Sms, &content)))
}

/// POST /theme/toggle - flip the theme cookie and refresh the page.
async fn toggle_theme(jar: CookieJar) -> impl IntoResponse {
    let next = theme_from(&jar).toggled();
    let cookie = Cookie::build((THEME_COOKIE, next.as_str())).path("/").build();
    (
        StatusCode::NO_CONTENT,
        jar.add(cookie),
        [("HX-Refresh", "true")],
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Fragment handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Chat form payload.
#[derive(Debug, Deserialize)]
struct ChatForm {
    /// Raw input text; trimmed before use.
    message: String,
}

/// POST /chat - relay one chat message and re-render the transcript.
///
/// Empty input and duplicate submissions answer 204, which HTMX treats as
/// "no swap": nothing observable happens.
async fn chat_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ChatForm>,
) -> Response {
    let (jar, session) = resolve_session(&state, jar);

    let message = form.message.trim();
    if message.is_empty() {
        return (jar, StatusCode::NO_CONTENT).into_response();
    }

    let Some(_guard) = session.begin(Channel::Chat) else {
        debug!(
            session_id = %session.id(),
            channel = Channel::Chat.as_str(),
            "submission dropped, request already in flight"
        );
        return (jar, StatusCode::NO_CONTENT).into_response();
    };

    session.add_user_entry(message);
    match state.gateway.chat(message).await {
        Ok(reply) => session.add_assistant_entry(reply),
        Err(e) => {
            warn!(session_id = %session.id(), error = %e, "chat relay failed");
            session.add_assistant_entry(ui::chat::FALLBACK_REPLY);
        }
    }

    (jar, Html(ui::chat::conversation_fragment(&session.entries()))).into_response()
}

/// POST /email - relay an email and re-render the form.
async fn email_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(draft): Form<EmailDraft>,
) -> Response {
    let (jar, session) = resolve_session(&state, jar);

    let Some(_guard) = session.begin(Channel::Email) else {
        debug!(
            session_id = %session.id(),
            channel = Channel::Email.as_str(),
            "submission dropped, request already in flight"
        );
        return (jar, StatusCode::NO_CONTENT).into_response();
    };

    let fragment = match state.gateway.send_email(&draft).await {
        Ok(()) => {
            info!(session_id = %session.id(), "email relayed");
            ui::email::form_fragment(
                &EmailDraft::default(),
                Some(&StatusLine::success(ui::email::SENT_STATUS)),
            )
        }
        Err(e) => {
            warn!(session_id = %session.id(), error = %e, "email relay failed");
            let text = e.detail().unwrap_or(ui::email::FAILED_STATUS).to_string();
            ui::email::form_fragment(&draft, Some(&StatusLine::error(text)))
        }
    };

    (jar, Html(fragment)).into_response()
}

/// POST /sms - relay an SMS and re-render the form.
async fn sms_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(draft): Form<SmsDraft>,
) -> Response {
    let (jar, session) = resolve_session(&state, jar);

    let Some(_guard) = session.begin(Channel::Sms) else {
        debug!(
            session_id = %session.id(),
            channel = Channel::Sms.as_str(),
            "submission dropped, request already in flight"
        );
        return (jar, StatusCode::NO_CONTENT).into_response();
    };

    let fragment = match state.gateway.send_sms(&draft).await {
        Ok(()) => {
            info!(session_id = %session.id(), "sms relayed");
            ui::sms::form_fragment(
                &SmsDraft::default(),
                Some(&StatusLine::success(ui::sms::SENT_STATUS)),
            )
        }
        Err(e) => {
            warn!(session_id = %session.id(), error = %e, "sms relay failed");
            let text = e.detail().unwrap_or(ui::sms::FAILED_STATUS).to_string();
            ui::sms::form_fragment(&draft, Some(&StatusLine::error(text)))
        }
    };

    (jar, Html(fragment)).into_response()
}
