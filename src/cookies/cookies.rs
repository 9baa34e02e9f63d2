//! Cookie core types.
//!
//! [`Cookie`] captures the attributes of a single cookie as the consent layer writes it
//! and as the backends persist it. It can be (de)serialized via `serde`; expiry
//! timestamps are stored as RFC 3339 strings.
//!
//! ```rust
//! use cookie_consent::cookies::{Cookie, SameSite};
//!
//! let mut c = Cookie::new("lgf_cookie_consent", "{}");
//! c.path = Some("/".into());
//! c.same_site = Some(SameSite::Strict);
//! assert!(!c.is_expired());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// SameSite policy of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SameSite {
    /// Never sent on cross-site requests.
    Strict,
    /// Sent on top-level cross-site navigations.
    Lax,
    /// Always sent (browsers require `Secure` as well).
    None,
}

impl SameSite {
    /// Parses a `SameSite` attribute value, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("strict") {
            Some(SameSite::Strict)
        } else if value.eq_ignore_ascii_case("lax") {
            Some(SameSite::Lax)
        } else if value.eq_ignore_ascii_case("none") {
            Some(SameSite::None)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cookie as stored by the jars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name (case-sensitive).
    pub name: String,

    /// Raw cookie value (not URL-decoded).
    pub value: String,

    /// Path scoping (e.g., `"/"`).
    pub path: Option<String>,

    /// Domain scoping (host-only if `None`).
    pub domain: Option<String>,

    /// If `true`, cookie is sent only over HTTPS.
    pub secure: bool,

    /// Absolute expiry. Session cookies have `None`.
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires: Option<OffsetDateTime>,

    /// SameSite policy, if one was given.
    pub same_site: Option<SameSite>,

    /// If `true`, cookie is hidden from client-side scripts.
    pub http_only: bool,
}

impl Cookie {
    /// Creates a session cookie with no attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            secure: false,
            expires: None,
            same_site: None,
            http_only: false,
        }
    }

    /// Returns `true` when the cookie has an expiry at or before `now`.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        matches!(self.expires, Some(expires) if expires <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc())
    }
}
