//! Route guard: decides from an explicit request context whether a path may
//! be served or the caller must be sent elsewhere.

use super::jwt::Claims;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Cookie value that stands in for a session during development.
pub const DEV_TOKEN_VALUE: &str = "true";

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub session: Option<Claims>,
    pub dev_token: Option<String>,
}

impl RequestContext {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some() || self.dev_token.as_deref() == Some(DEV_TOKEN_VALUE)
    }

    /// Who is acting, for logs.
    pub fn actor(&self) -> &str {
        match &self.session {
            Some(claims) => claims.email.as_deref().unwrap_or(&claims.sub),
            None if self.is_authenticated() => "dev",
            None => "anonymous",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

pub fn guard(path: &str, ctx: &RequestContext) -> GuardDecision {
    let authenticated = ctx.is_authenticated();
    if authenticated && path == LOGIN_PATH {
        GuardDecision::Redirect(HOME_PATH)
    } else if !authenticated && path != LOGIN_PATH {
        GuardDecision::Redirect(LOGIN_PATH)
    } else {
        GuardDecision::Allow
    }
}
