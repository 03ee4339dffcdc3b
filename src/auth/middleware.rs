use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};

use super::session::{BrowserSession, SessionStore};
use crate::constants::SESSION_COOKIE;

/// Read a cookie value from the request headers.
#[must_use]
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}

/// Current session (if any).
/// Use this extractor on public pages such as the login form.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<BrowserSession>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
    SessionStore: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = SessionStore::from_ref(state);

        let Some(token) = cookie_value(&parts.headers, SESSION_COOKIE) else {
            return Ok(MaybeSession(None));
        };

        Ok(MaybeSession(store.open(token)))
    }
}

/// Current session (required).
/// Redirects to the login page when no one is signed in.
#[derive(Debug, Clone)]
pub struct RequireSession(pub BrowserSession);

#[async_trait]
impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
    SessionStore: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeSession(session) = MaybeSession::from_request_parts(parts, state).await?;

        match session {
            Some(s) => Ok(RequireSession(s)),
            None => Err(Redirect::to("/auth/login").into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc123; flash=s%3Ahi"),
        );

        assert_eq!(cookie_value(&headers, "session"), Some("abc123"));
        assert_eq!(cookie_value(&headers, "flash"), Some("s%3Ahi"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_cookie_name_must_match_exactly() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("xsession=nope"));
        assert_eq!(cookie_value(&headers, "session"), None);
    }
}
