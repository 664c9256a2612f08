//! One-shot flash messages
//!
//! Admin form endpoints answer with a redirect. The message describing the
//! outcome travels in a signed cookie and is consumed by the next view.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};

/// Name of the flash cookie
pub const FLASH_COOKIE: &str = "ballotbox_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

/// A message shown once on the next view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Store a flash message for the next request
pub fn push(jar: SignedCookieJar, flash: Flash) -> SignedCookieJar {
    let value = match serde_json::to_string(&flash) {
        Ok(value) => value,
        Err(_) => return jar,
    };
    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Consume the pending flash message, if any
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<Flash>) {
    let flash: Option<Flash> = jar
        .get(FLASH_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok());

    match flash {
        Some(flash) => (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), Some(flash)),
        None => (jar, None),
    }
}
