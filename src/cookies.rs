//! Cookies: the [`Cookie`] record, the [`CookieJar`] storage abstraction and its backends.
//!
//! The consent envelope is persisted as a single cookie. Every backend enforces cookie
//! expiry on its own, so an expired consent cookie simply stops being returned; nothing
//! in the consent layer ever deletes it.
//!
//! Backends:
//! - [`InMemoryCookieJar`]: behaves like a page's `document.cookie`. Default and used in tests.
//! - [`JsonCookieStore`]: one JSON file on disk.

mod cookies;
mod cookie_jar;
mod header;
mod store;

pub use cookies::Cookie;
pub use cookies::SameSite;

pub use cookie_jar::CookieJar;
pub use cookie_jar::InMemoryCookieJar;

pub use header::{format_http_date, format_set_cookie, parse_http_date, parse_set_cookie};

pub use store::JsonCookieStore;
