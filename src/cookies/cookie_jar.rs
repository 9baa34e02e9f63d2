//! Cookie jar abstraction and a simple in-memory implementation.
//!
//! A **cookie jar** is the storage medium the consent envelope lives in. The consent
//! layer only ever addresses cookies by name; scoping by path/domain is left to the
//! medium (a browser, a `Set-Cookie` response, a file).
//!
//! Jars own expiry: [`CookieJar::get_cookie`] and [`CookieJar::cookies`] never yield a
//! cookie whose `expires` lies in the past, and storing an already-expired cookie removes
//! any live cookie with that name, the same way a browser treats it.

use crate::cookies::header::parse_set_cookie;
use crate::cookies::Cookie;
use anyhow::Result;
use time::OffsetDateTime;

/// Storage medium for cookies, addressed by cookie name.
pub trait CookieJar {
    /// Returns the live cookie called `name`, if any.
    fn get_cookie(&self, name: &str) -> Option<Cookie>;

    /// Stores `cookie`, fully replacing a cookie with the same name.
    ///
    /// An already-expired `cookie` deletes the stored one instead.
    fn set_cookie(&mut self, cookie: Cookie) -> Result<()>;

    /// Removes the cookie called `name`. Removing an unknown cookie is not an error.
    fn remove_cookie(&mut self, name: &str) -> Result<()>;

    /// Returns all live cookies.
    fn cookies(&self) -> Vec<Cookie>;

    /// Returns all live cookies formatted like `document.cookie` (`"a=1; b=2"`).
    fn cookie_string(&self) -> String {
        self.cookies()
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// In-memory jar that behaves like a page's `document.cookie`.
///
/// Insertion order is kept, so [`CookieJar::cookie_string`] is deterministic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCookieJar {
    entries: Vec<Cookie>,
}

impl InMemoryCookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a `Set-Cookie` style string, like `document.cookie = "..."` does.
    ///
    /// Strings that do not contain a `name=value` pair are ignored.
    pub fn set_cookie_string(&mut self, header: &str) {
        match parse_set_cookie(header, OffsetDateTime::now_utc()) {
            Some(cookie) => self.store(cookie),
            None => log::debug!("InMemoryCookieJar: ignoring malformed cookie string {header:?}"),
        }
    }

    fn store(&mut self, cookie: Cookie) {
        if cookie.is_expired() {
            self.entries.retain(|c| c.name != cookie.name);
            return;
        }

        if let Some(existing) = self.entries.iter_mut().find(|c| c.name == cookie.name) {
            *existing = cookie;
        } else {
            self.entries.push(cookie);
        }
    }
}

impl CookieJar for InMemoryCookieJar {
    fn get_cookie(&self, name: &str) -> Option<Cookie> {
        let now = OffsetDateTime::now_utc();
        self.entries
            .iter()
            .find(|c| c.name == name && !c.is_expired_at(now))
            .cloned()
    }

    fn set_cookie(&mut self, cookie: Cookie) -> Result<()> {
        self.store(cookie);
        Ok(())
    }

    fn remove_cookie(&mut self, name: &str) -> Result<()> {
        self.entries.retain(|c| c.name != name);
        Ok(())
    }

    fn cookies(&self) -> Vec<Cookie> {
        let now = OffsetDateTime::now_utc();
        self.entries.iter().filter(|c| !c.is_expired_at(now)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn cookie(name: &str, value: &str, ttl: Option<Duration>) -> Cookie {
        let mut c = Cookie::new(name, value);
        c.expires = ttl.map(|d| OffsetDateTime::now_utc() + d);
        c
    }

    #[test]
    fn set_replaces_cookie_with_same_name() {
        let mut jar = InMemoryCookieJar::new();
        jar.set_cookie(cookie("a", "1", None)).unwrap();
        jar.set_cookie(cookie("b", "2", None)).unwrap();
        jar.set_cookie(cookie("a", "ONE", None)).unwrap();

        assert_eq!(jar.cookies().len(), 2);
        assert_eq!(jar.get_cookie("a").unwrap().value, "ONE");
        assert_eq!(jar.cookie_string(), "a=ONE; b=2");
    }

    #[test]
    fn expired_cookies_are_invisible() {
        let mut jar = InMemoryCookieJar::new();
        jar.entries.push(cookie("old", "x", Some(Duration::days(-1))));
        jar.set_cookie(cookie("fresh", "y", Some(Duration::days(1)))).unwrap();

        assert!(jar.get_cookie("old").is_none());
        assert!(jar.get_cookie("fresh").is_some());
        assert_eq!(jar.cookie_string(), "fresh=y");
    }

    #[test]
    fn storing_expired_cookie_deletes() {
        let mut jar = InMemoryCookieJar::new();
        jar.set_cookie(cookie("a", "1", Some(Duration::days(1)))).unwrap();
        jar.set_cookie(cookie("a", "", Some(Duration::seconds(-1)))).unwrap();

        assert!(jar.get_cookie("a").is_none());
        assert!(jar.entries.is_empty());
    }

    #[test]
    fn document_cookie_assignment() {
        let mut jar = InMemoryCookieJar::new();
        jar.set_cookie_string("theme=dark; path=/; SameSite=Strict");
        jar.set_cookie_string("garbage");
        jar.set_cookie_string("lang=en; Max-Age=3600");

        assert_eq!(jar.cookie_string(), "theme=dark; lang=en");
        assert_eq!(jar.get_cookie("theme").unwrap().path.as_deref(), Some("/"));

        jar.set_cookie_string("theme=; Max-Age=0");
        assert_eq!(jar.cookie_string(), "lang=en");
    }

    #[test]
    fn remove_unknown_is_ok() {
        let mut jar = InMemoryCookieJar::new();
        jar.remove_cookie("nope").unwrap();
        jar.set_cookie(cookie("a", "1", None)).unwrap();
        jar.remove_cookie("a").unwrap();
        assert!(jar.cookies().is_empty());
    }
}
