//! JSON-backed cookie store.
//!
//! `JsonCookieStore` persists all cookies in a single JSON file on disk. Every read
//! loads the file and every write **reads then rewrites** it, so the file is always the
//! single source of truth, even with several stores pointing at the same path.
//!
//! ### Caveats
//! - File writes are not atomic.
//! - A file that fails to deserialize is treated as empty (and logged); the next write
//!   replaces it.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::cookies::{Cookie, CookieJar};

/// On-disk representation of the store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CookieStoreFile {
    cookies: Vec<Cookie>,
}

/// A JSON-based cookie store that persists cookies across sessions.
#[derive(Debug, Clone)]
pub struct JsonCookieStore {
    /// Path to the JSON file where cookies are stored.
    path: PathBuf,
}

impl JsonCookieStore {
    /// Creates (or opens) a JSON cookie store at `path`.
    ///
    /// If the file does not exist, an empty structure is written to disk.
    pub fn new(path: PathBuf) -> Result<Self> {
        let store = Self { path };
        if !store.path.exists() {
            store.save_file(&CookieStoreFile::default())?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full store file.
    ///
    /// Returns an empty structure if the file is missing or cannot be deserialized.
    fn load_file(&self) -> CookieStoreFile {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                log::warn!("JsonCookieStore[{}]: cannot read store file: {}", self.path.display(), e);
                return CookieStoreFile::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("JsonCookieStore[{}]: discarding unreadable store file: {}", self.path.display(), e);
            CookieStoreFile::default()
        })
    }

    /// Serializes and writes the full store file (pretty-printed).
    fn save_file(&self, store_file: &CookieStoreFile) -> Result<()> {
        let contents = serde_json::to_string_pretty(store_file).context("cannot serialize cookies")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("cannot write cookie store file {}", self.path.display()))
    }
}

impl CookieJar for JsonCookieStore {
    fn get_cookie(&self, name: &str) -> Option<Cookie> {
        let now = OffsetDateTime::now_utc();
        self.load_file()
            .cookies
            .into_iter()
            .find(|c| c.name == name && !c.is_expired_at(now))
    }

    fn set_cookie(&mut self, cookie: Cookie) -> Result<()> {
        let now = OffsetDateTime::now_utc();
        let mut store_file = self.load_file();
        store_file.cookies.retain(|c| c.name != cookie.name && !c.is_expired_at(now));
        if !cookie.is_expired_at(now) {
            store_file.cookies.push(cookie);
        }
        self.save_file(&store_file)
    }

    fn remove_cookie(&mut self, name: &str) -> Result<()> {
        let mut store_file = self.load_file();
        store_file.cookies.retain(|c| c.name != name);
        self.save_file(&store_file)
    }

    fn cookies(&self) -> Vec<Cookie> {
        let now = OffsetDateTime::now_utc();
        self.load_file()
            .cookies
            .into_iter()
            .filter(|c| !c.is_expired_at(now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn store_in(dir: &tempfile::TempDir) -> JsonCookieStore {
        JsonCookieStore::new(dir.path().join("cookies.json")).unwrap()
    }

    #[test]
    fn new_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.path().exists());
        assert!(store.cookies().is_empty());
    }

    #[test]
    fn cookies_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let mut c = Cookie::new("consent", "{\"version\":1}");
        c.expires = Some(OffsetDateTime::now_utc() + Duration::days(365));
        store.set_cookie(c.clone()).unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.get_cookie("consent"), Some(c));
    }

    #[test]
    fn write_replaces_and_prunes_expired() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let mut stale = Cookie::new("stale", "x");
        stale.expires = Some(OffsetDateTime::now_utc() - Duration::days(1));
        store.save_file(&CookieStoreFile { cookies: vec![stale] }).unwrap();
        assert!(store.get_cookie("stale").is_none());

        store.set_cookie(Cookie::new("a", "1")).unwrap();
        store.set_cookie(Cookie::new("a", "2")).unwrap();

        let raw = store.load_file();
        assert_eq!(raw.cookies.len(), 1);
        assert_eq!(raw.cookies[0].value, "2");
    }

    #[test]
    fn corrupted_file_reads_as_empty_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(store.cookies().is_empty());
        store.set_cookie(Cookie::new("a", "1")).unwrap();
        assert_eq!(store.get_cookie("a").unwrap().value, "1");
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonCookieStore { path: dir.path().join("gone").join("cookies.json") };
        assert!(store.set_cookie(Cookie::new("a", "1")).is_err());
    }
}
