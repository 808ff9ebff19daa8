use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use http::header::{HeaderMap, AUTHORIZATION, COOKIE};
use serde::Serialize;
use tracing::debug;

use crate::auth::guard::{guard, GuardDecision, RequestContext, LOGIN_PATH};
use crate::auth::jwt::verify_token;
use crate::state::AppState;

pub const DEV_TOKEN_COOKIE: &str = "dev_token";

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    code: &'static str,
    redirect: &'static str,
}

/// Builds the [`RequestContext`] for the request, applies the route guard and
/// exposes the context to handlers as an extension.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let ctx = request_context(req.headers(), &state);

    match guard(req.uri().path(), &ctx) {
        GuardDecision::Allow => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        GuardDecision::Redirect(target) if target == LOGIN_PATH => unauthorized(),
        GuardDecision::Redirect(target) => Redirect::to(target).into_response(),
    }
}

fn request_context(headers: &HeaderMap, state: &AppState) -> RequestContext {
    let session = bearer_token(headers).and_then(|token| {
        verify_token(token, &state.config.jwt_secret)
            .map_err(|e| debug!(error = %e, "Rejected session token"))
            .ok()
    });

    let dev_token = if state.config.allow_dev_token {
        cookie_value(headers, DEV_TOKEN_COOKIE)
    } else {
        None
    };

    RequestContext { session, dev_token }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn unauthorized() -> Response {
    let body = axum::Json(ErrorBody {
        error: "Authentication required",
        code: "unauthorized",
        redirect: LOGIN_PATH,
    });
    (StatusCode::UNAUTHORIZED, body).into_response()
}
