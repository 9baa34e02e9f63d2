//! Cookie string handling: `Set-Cookie` rendering and parsing.
//!
//! Parsing covers the attributes the consent cookie uses: `Expires`, `Max-Age`, `Path`,
//! `Domain` (leading dot stripped), `SameSite`, `Secure` and `HttpOnly`. Attribute names
//! are case-insensitive. Unknown attributes are ignored. `Max-Age` wins over `Expires`.

use crate::cookies::{Cookie, SameSite};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
const HTTP_DATE: &[BorrowedFormatItem<'_>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Formats `at` as an IMF-fixdate in GMT.
pub fn format_http_date(at: OffsetDateTime) -> Option<String> {
    at.to_offset(UtcOffset::UTC).format(HTTP_DATE).ok()
}

/// Parses an IMF-fixdate. Returns `None` for anything else.
pub fn parse_http_date(value: &str) -> Option<OffsetDateTime> {
    PrimitiveDateTime::parse(value.trim(), HTTP_DATE)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Renders `cookie` as a `Set-Cookie` header value.
pub fn format_set_cookie(cookie: &Cookie) -> String {
    let mut out = format!("{}={}", cookie.name, cookie.value);

    if let Some(expires) = cookie.expires {
        match format_http_date(expires) {
            Some(date) => {
                out.push_str("; expires=");
                out.push_str(&date);
            }
            None => log::warn!("Cookie[{}]: expiry {} cannot be rendered, writing a session cookie", cookie.name, expires),
        }
    }
    if let Some(path) = &cookie.path {
        out.push_str("; path=");
        out.push_str(path);
    }
    if let Some(domain) = &cookie.domain {
        out.push_str("; domain=");
        out.push_str(domain);
    }
    if let Some(same_site) = cookie.same_site {
        out.push_str("; SameSite=");
        out.push_str(same_site.as_str());
    }
    if cookie.secure {
        out.push_str("; Secure");
    }
    if cookie.http_only {
        out.push_str("; HttpOnly");
    }

    out
}

/// Parses a `Set-Cookie` header value (or a `document.cookie` assignment).
///
/// `now` anchors `Max-Age`. A non-positive `Max-Age` yields a cookie that is already
/// expired, which jars treat as a deletion.
pub fn parse_set_cookie(header: &str, now: OffsetDateTime) -> Option<Cookie> {
    let mut parts = header.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut cookie = Cookie::new(name, value.trim());
    let mut max_age: Option<i64> = None;

    for part in parts {
        let part = part.trim();
        if let Some((k, v)) = part.split_once('=') {
            let v = v.trim();
            match k.trim().to_ascii_lowercase().as_str() {
                "path" => cookie.path = Some(v.to_string()),
                "domain" => cookie.domain = Some(v.trim_start_matches('.').to_string()),
                "expires" => cookie.expires = parse_http_date(v),
                "max-age" => max_age = v.parse().ok(),
                "samesite" => cookie.same_site = SameSite::parse(v),
                _ => {}
            }
        } else if part.eq_ignore_ascii_case("secure") {
            cookie.secure = true;
        } else if part.eq_ignore_ascii_case("httponly") {
            cookie.http_only = true;
        }
    }

    if let Some(seconds) = max_age {
        cookie.expires = Some(if seconds <= 0 {
            OffsetDateTime::UNIX_EPOCH
        } else {
            now + Duration::seconds(seconds)
        });
    }

    Some(cookie)
}
