//!
//! src/csrf.rs  Andrew Belles  Oct 19th, 2026
//!
//! Pulls the anti-forgery token out of a cookie header
//!

use percent_encoding::percent_decode_str;

/// Looks up `name` in a `a=b; c=d` style cookie string and URL-decodes
/// its value. First match wins, a value that does not decode to utf-8
/// is treated as absent
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    cookies.split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .and_then(|raw| percent_decode_str(raw).decode_utf8().ok())
        .map(|v| v.into_owned())
}
