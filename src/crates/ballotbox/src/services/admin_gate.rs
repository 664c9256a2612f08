//! Admin session gate
//!
//! A single shared password guards every administrative route. The session
//! itself is just the login time, carried in a signed cookie; the gate decides
//! whether that time is still within the configured lifetime.

use chrono::{DateTime, Duration, TimeZone, Utc};
use sha2::{Digest, Sha256};
use tracing::warn;

/// Name of the signed admin session cookie
pub const SESSION_COOKIE: &str = "ballotbox_admin";

/// Longest accepted session lifetime (one year)
const MAX_TTL_MINUTES: u64 = 60 * 24 * 365;

/// Admin session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSession {
    Anonymous,
    Authenticated { since: DateTime<Utc> },
}

impl AdminSession {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AdminSession::Authenticated { .. })
    }

    /// Value stored in the session cookie, `None` when anonymous
    pub fn cookie_value(&self) -> Option<String> {
        match self {
            AdminSession::Anonymous => None,
            AdminSession::Authenticated { since } => Some(since.timestamp().to_string()),
        }
    }
}

/// Password check and session expiry
#[derive(Debug, Clone)]
pub struct AdminGate {
    password_digest: [u8; 32],
    ttl: Duration,
}

impl AdminGate {
    pub fn new(password: &str, ttl_minutes: u64) -> Self {
        Self {
            password_digest: digest(password),
            ttl: Duration::minutes(ttl_minutes.min(MAX_TTL_MINUTES) as i64),
        }
    }

    /// Session lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Compare a candidate password against the configured one
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate = digest(candidate);
        self.password_digest
            .iter()
            .zip(candidate.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Start a session on a matching password
    pub fn login(&self, candidate: &str) -> AdminSession {
        self.login_at(candidate, Utc::now())
    }

    pub fn login_at(&self, candidate: &str, now: DateTime<Utc>) -> AdminSession {
        if self.verify(candidate) {
            AdminSession::Authenticated { since: now }
        } else {
            warn!("Admin login failed");
            AdminSession::Anonymous
        }
    }

    /// Rebuild the session from a verified cookie value
    pub fn restore(&self, cookie_value: Option<&str>, now: DateTime<Utc>) -> AdminSession {
        let Some(since) = cookie_value
            .and_then(|value| value.parse::<i64>().ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        else {
            return AdminSession::Anonymous;
        };

        if since > now || now - since > self.ttl {
            return AdminSession::Anonymous;
        }
        AdminSession::Authenticated { since }
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}
