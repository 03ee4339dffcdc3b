//! One-shot toast messages carried across a redirect in a cookie.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};

use crate::auth::cookie_value;
use crate::components::{Toast, Tone};
use crate::constants::FLASH_COOKIE;

const FLASH_MAX_AGE_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Cookie value: `<kind>:<url-encoded message>`.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{}:{}",
            self.kind.as_str(),
            urlencoding::encode(&self.message)
        )
    }

    #[must_use]
    pub fn decode(raw: &str) -> Option<Self> {
        let (kind, message) = raw.split_once(':')?;
        let kind = match kind {
            "success" => FlashKind::Success,
            "error" => FlashKind::Error,
            _ => return None,
        };
        let message = urlencoding::decode(message).ok()?.into_owned();
        Some(Self { kind, message })
    }

    #[must_use]
    pub fn toast(&self) -> Toast<'_> {
        let variant = match self.kind {
            FlashKind::Success => Tone::Success,
            FlashKind::Error => Tone::Error,
        };
        Toast::new(variant, &self.message)
    }

    #[must_use]
    pub fn set_cookie(&self) -> String {
        format!(
            "{FLASH_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={FLASH_MAX_AGE_SECS}",
            self.encode()
        )
    }
}

#[must_use]
pub fn clear_flash_cookie() -> String {
    format!("{FLASH_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Redirect to `to`, showing `flash` on the next page.
#[must_use]
pub fn redirect_with_flash(to: &str, flash: &Flash) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, flash.set_cookie())]),
        Redirect::to(to),
    )
        .into_response()
}

/// Flash message left by the previous response, if any.
#[derive(Debug, Clone)]
pub struct IncomingFlash(pub Option<Flash>);

impl IncomingFlash {
    #[must_use]
    pub fn toast(&self) -> Option<Toast<'_>> {
        self.0.as_ref().map(Flash::toast)
    }

    /// Add the cookie-clearing header once the message has been shown.
    #[must_use]
    pub fn consume(&self, mut response: Response) -> Response {
        if self.0.is_some() {
            if let Ok(value) = HeaderValue::from_str(&clear_flash_cookie()) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for IncomingFlash {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            cookie_value(&parts.headers, FLASH_COOKIE).and_then(Flash::decode),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let flash = Flash::error("Delete post failed: 500; boom");
        let encoded = flash.encode();
        assert!(!encoded.contains(';'));
        assert_eq!(Flash::decode(&encoded), Some(flash));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(Flash::decode("nonsense"), None);
        assert_eq!(Flash::decode("info:hi"), None);
    }

    #[test]
    fn test_redirect_sets_cookie() {
        let response = redirect_with_flash("/users", &Flash::success("User approved"));
        assert_eq!(response.headers()[header::LOCATION], "/users");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash=success:User%20approved;"));
    }

    #[test]
    fn test_consume_clears_only_when_present() {
        let shown = IncomingFlash(Some(Flash::success("x"))).consume(Response::default());
        assert!(shown.headers().contains_key(header::SET_COOKIE));

        let none = IncomingFlash(None).consume(Response::default());
        assert!(!none.headers().contains_key(header::SET_COOKIE));
    }
}
