//! Consent configuration.
//!
//! `ConsentConfig` controls how the consent decision is persisted (cookie name,
//! retention, scoping attributes) and when the decision prompt appears.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use cookie_consent::ConsentConfig;
//! let cfg = ConsentConfig::default();
//! assert_eq!(cfg.cookie_name, "lgf_cookie_consent");
//! assert_eq!(cfg.retention, time::Duration::days(365));
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use cookie_consent::ConsentConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = ConsentConfig::builder()
//!     .cookie_name("site_consent")
//!     .retention_days(180)
//!     .domain("example.com")
//!     .secure(true)
//!     .grace_delay(std::time::Duration::from_secs(2))
//!     .build()?; // returns Result<ConsentConfig, ConfigError>
//! # Ok(()) }
//! ```
//!
//! # Errors
//!
//! Builder validation returns [`ConfigError`] for an empty or invalid cookie name, a
//! retention window outside `(0, 400 days]`, a path that does not start with `/`, or a
//! zero event capacity.

use crate::consent::SCHEMA_VERSION;
use crate::cookies::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

/// Name of the consent cookie.
pub const DEFAULT_COOKIE_NAME: &str = "lgf_cookie_consent";
/// How long a decision is kept before the cookie expires.
pub const DEFAULT_RETENTION_DAYS: i64 = 365;
/// Longest retention a browser honours for a cookie (RFC 6265bis caps it at 400 days).
pub const MAX_RETENTION_DAYS: i64 = 400;
/// Delay between startup and showing the decision prompt.
pub const DEFAULT_GRACE_DELAY: std::time::Duration = std::time::Duration::from_millis(500);
/// Buffered consent events per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct ConsentConfig {
    /// Cookie the envelope is stored under.
    pub cookie_name: String,
    /// Envelope schema version written on save.
    pub schema_version: u32,
    /// Retention window, counted from each write.
    pub retention: Duration,
    /// Cookie `path` attribute.
    pub path: String,
    /// Cookie `domain` attribute (host-only when `None`).
    pub domain: Option<String>,
    pub same_site: SameSite,
    pub secure: bool,
    /// Time to wait after startup before asking for a decision.
    pub grace_delay: std::time::Duration,
    /// Capacity of the consent event channel.
    pub event_capacity: usize,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            schema_version: SCHEMA_VERSION,
            retention: Duration::days(DEFAULT_RETENTION_DAYS),
            path: "/".to_string(),
            domain: None,
            same_site: SameSite::Strict,
            secure: false,
            grace_delay: DEFAULT_GRACE_DELAY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ConsentConfig {
    pub fn builder() -> ConsentConfigBuilder {
        ConsentConfigBuilder::default()
    }

    /// Builds the consent cookie carrying `value`, written at `now`.
    ///
    /// Returns `None` when `now + retention` falls outside the representable date range,
    /// which only a hand-built config can reach.
    pub fn consent_cookie(&self, value: String, now: OffsetDateTime) -> Option<Cookie> {
        let expires = now.checked_add(self.retention)?;
        Some(Cookie {
            name: self.cookie_name.clone(),
            value,
            path: Some(self.path.clone()),
            domain: self.domain.clone(),
            secure: self.secure,
            expires: Some(expires),
            same_site: Some(self.same_site),
            http_only: false,
        })
    }
}

/// Builder for [`ConsentConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConsentConfigBuilder {
    inner: ConsentConfig,
}

impl ConsentConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut ConsentConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn cookie_name<S: Into<String>>(self, name: S) -> Self { self.map(|c| c.cookie_name = name.into()) }
    pub fn schema_version(self, version: u32) -> Self { self.map(|c| c.schema_version = version) }
    pub fn retention(self, retention: Duration) -> Self { self.map(|c| c.retention = retention) }
    pub fn retention_days(self, days: i64) -> Self { self.map(|c| c.retention = Duration::days(days)) }
    pub fn path<S: Into<String>>(self, path: S) -> Self { self.map(|c| c.path = path.into()) }
    pub fn domain<S: Into<String>>(self, domain: S) -> Self { self.map(|c| c.domain = Some(domain.into())) }
    pub fn same_site(self, same_site: SameSite) -> Self { self.map(|c| c.same_site = same_site) }
    pub fn secure(self, on: bool) -> Self { self.map(|c| c.secure = on) }
    pub fn grace_delay(self, delay: std::time::Duration) -> Self { self.map(|c| c.grace_delay = delay) }
    pub fn event_capacity(self, n: usize) -> Self { self.map(|c| c.event_capacity = n) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut ConsentConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<ConsentConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("cookie_name must not be empty")]
    EmptyCookieName,

    #[error("cookie_name {0:?} contains characters not allowed in a cookie name")]
    InvalidCookieName(String),

    #[error("retention must be positive (got {0})")]
    NonPositiveRetention(Duration),

    #[error("retention must not exceed 400 days (got {0})")]
    RetentionTooLong(Duration),

    #[error("path {0:?} must start with '/'")]
    InvalidPath(String),

    #[error("event_capacity must be at least 1")]
    ZeroEventCapacity,
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '"' | '/' | '[' | ']' | '?' | '=' | '{' | '}')
}

fn validate(c: &ConsentConfig) -> Result<(), ConfigError> {
    if c.cookie_name.is_empty() {
        return Err(ConfigError::EmptyCookieName);
    }
    if !c.cookie_name.chars().all(is_token_char) {
        return Err(ConfigError::InvalidCookieName(c.cookie_name.clone()));
    }
    if !c.retention.is_positive() {
        return Err(ConfigError::NonPositiveRetention(c.retention));
    }
    if c.retention > Duration::days(MAX_RETENTION_DAYS) {
        return Err(ConfigError::RetentionTooLong(c.retention));
    }
    if !c.path.starts_with('/') || c.path.contains(';') {
        return Err(ConfigError::InvalidPath(c.path.clone()));
    }
    if c.event_capacity == 0 {
        return Err(ConfigError::ZeroEventCapacity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn defaults_match_consent_cookie_contract() {
        let cfg = ConsentConfig::default();
        assert_eq!(cfg.cookie_name, "lgf_cookie_consent");
        assert_eq!(cfg.schema_version, 1);
        assert_eq!(cfg.retention, Duration::days(365));
        assert_eq!(cfg.path, "/");
        assert_eq!(cfg.same_site, SameSite::Strict);
        assert_eq!(cfg.grace_delay, std::time::Duration::from_millis(500));
        assert!(ConsentConfig::builder().build().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let cfg = ConsentConfig::builder()
            .cookie_name("consent")
            .retention_days(30)
            .domain("example.com")
            .secure(true)
            .same_site(SameSite::Lax)
            .with(|c| c.path = "/shop".into())
            .build()
            .unwrap();

        assert_eq!(cfg.cookie_name, "consent");
        assert_eq!(cfg.retention, Duration::days(30));
        assert_eq!(cfg.domain.as_deref(), Some("example.com"));
        assert!(cfg.secure);
        assert_eq!(cfg.same_site, SameSite::Lax);
        assert_eq!(cfg.path, "/shop");
    }

    #[test]
    fn builder_rejects_invalid_values() {
        assert_eq!(ConsentConfig::builder().cookie_name("").build(), Err(ConfigError::EmptyCookieName));
        assert!(matches!(
            ConsentConfig::builder().cookie_name("a=b").build(),
            Err(ConfigError::InvalidCookieName(_))
        ));
        assert!(matches!(
            ConsentConfig::builder().cookie_name("has space").build(),
            Err(ConfigError::InvalidCookieName(_))
        ));
        assert!(matches!(
            ConsentConfig::builder().retention_days(0).build(),
            Err(ConfigError::NonPositiveRetention(_))
        ));
        assert!(matches!(
            ConsentConfig::builder().retention(Duration::MAX).build(),
            Err(ConfigError::RetentionTooLong(_))
        ));
        assert!(matches!(
            ConsentConfig::builder().retention_days(401).build(),
            Err(ConfigError::RetentionTooLong(_))
        ));
        assert!(ConsentConfig::builder().retention_days(400).build().is_ok());
        assert!(matches!(
            ConsentConfig::builder().path("relative").build(),
            Err(ConfigError::InvalidPath(_))
        ));
        assert_eq!(ConsentConfig::builder().event_capacity(0).build(), Err(ConfigError::ZeroEventCapacity));
    }

    #[test]
    fn consent_cookie_expires_after_retention() {
        let cfg = ConsentConfig::default();
        let now = datetime!(2024-01-01 00:00 UTC);
        let cookie = cfg.consent_cookie("{}".into(), now).unwrap();

        assert_eq!(cookie.name, "lgf_cookie_consent");
        assert_eq!(cookie.expires, Some(datetime!(2024-12-31 00:00 UTC)));
        assert_eq!(cookie.path.as_deref(), Some("/"));
        assert_eq!(cookie.same_site, Some(SameSite::Strict));
        assert!(!cookie.http_only);
    }

    #[test]
    fn consent_cookie_out_of_range_expiry_is_none() {
        let cfg = ConsentConfig { retention: Duration::MAX, ..ConsentConfig::default() };
        assert!(cfg.consent_cookie("{}".into(), datetime!(2024-01-01 00:00 UTC)).is_none());
    }
}
