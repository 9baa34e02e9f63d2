//! Durable cookie jars.
//!
//! [`JsonCookieStore`] keeps cookies in a single JSON file across sessions, which is what
//! lets a consent decision survive a restart. It implements
//! [`CookieJar`](crate::cookies::CookieJar) directly and prunes expired cookies on every
//! write.
//!
//! ## Example
//! ```rust,no_run
//! use cookie_consent::cookies::JsonCookieStore;
//! use cookie_consent::ConsentStore;
//!
//! let jar = JsonCookieStore::new("consent-cookies.json".into()).unwrap();
//! let mut store = ConsentStore::builder().jar(jar).build();
//! store.initialize();
//! ```
mod json;

/// File-backed JSON cookie store.
pub use json::JsonCookieStore;
