//! The gateway's HTTP routes and cookie transport.
//!
//! The session token travels in the `webjive_jwt` cookie; login also returns
//! it in the response body so non-browser callers can store it themselves.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::http::response::ApiError;
use crate::identity::IdentityRecord;
use crate::metrics;
use crate::strategies::{Credentials, VerifierChain};
use crate::token::TokenService;

/// Cookie carrying the session token, shared between issuance and reads.
pub const COOKIE_NAME: &str = "webjive_jwt";

/// Shared handles for the request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Token issuance/verification/renewal.
    pub tokens: Arc<TokenService>,
    /// Configured verification strategies.
    pub verifiers: Arc<VerifierChain>,
    /// Whether issued cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

/// Successful login body.
#[derive(Debug, Serialize)]
struct LoginResponse {
    webjive_jwt: String,
}

/// Build the gateway router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/extend", post(extend))
        .route("/logout", post(logout))
        .route("/user", get(user))
        .route("/metrics", get(metrics_text))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .same_site(SameSite::None)
        .secure(state.cookie_secure)
        .build()
}

fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(COOKIE_NAME).path("/"))
}

/// `POST /login` — verify credentials, issue a token, set the cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let Json(credentials) = payload.map_err(|e| ApiError::bad_request(&e.body_text()))?;

    let identity = state.verifiers.authenticate(&credentials).await?;
    let token = state.tokens.issue(&identity)?;
    metrics::TOKENS_ISSUED.with_label_values(&["login"]).inc();

    let raw = token.into_raw();
    let jar = jar.add(session_cookie(&state, raw.clone()));
    Ok((jar, Json(LoginResponse { webjive_jwt: raw })))
}

/// `POST /extend` — reissue the cookie's token with a fresh expiry window.
///
/// Renewal trusts the presented token; credentials are never re-checked.
/// On any failure the cookie is cleared so the client stops presenting a
/// dead token.
async fn extend(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), (CookieJar, ApiError)> {
    let Some(cookie) = jar.get(COOKIE_NAME) else {
        metrics::TOKENS_RENEWED.with_label_values(&["missing"]).inc();
        return Err((
            clear_session_cookie(jar.clone()),
            ApiError::from(crate::error::TokenFailure::TokenInvalid),
        ));
    };
    let raw = cookie.value().to_string();

    match state.tokens.renew(&raw) {
        Ok(token) => {
            metrics::TOKENS_RENEWED.with_label_values(&["success"]).inc();
            let jar = jar.add(session_cookie(&state, token.into_raw()));
            Ok((jar, StatusCode::OK))
        }
        Err(failure) => {
            metrics::TOKENS_RENEWED.with_label_values(&["failure"]).inc();
            debug!(code = failure.code().as_str(), "token renewal refused");
            Err((clear_session_cookie(jar), ApiError::from(failure)))
        }
    }
}

/// `POST /logout` — clear the cookie unconditionally; no token validation.
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (clear_session_cookie(jar), StatusCode::OK)
}

/// `GET /user` — the identity behind the cookie, or JSON `null`.
///
/// Never errors, so anonymous clients can poll it without triggering 4xx
/// noise; any verification failure is indistinguishable from no session.
async fn user(State(state): State<AppState>, jar: CookieJar) -> Json<Option<IdentityRecord>> {
    let identity = jar
        .get(COOKIE_NAME)
        .and_then(|cookie| state.tokens.verify(cookie.value()).ok());
    Json(identity)
}

/// `GET /metrics` — prometheus text exposition.
async fn metrics_text() -> impl IntoResponse {
    let encoder = prometheus::TextEncoder::new();
    match encoder.encode_to_string(&prometheus::gather()) {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
