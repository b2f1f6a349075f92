//! Header sets, canonical header names and auth-scheme helpers.

use std::collections::HashMap;

use base64::Engine;

/// Header set: case-sensitive field name to a single value.
///
/// Keys are unique; merging two sets is last-write-wins.
pub type Header = HashMap<String, String>;

/// `Authorization` header name.
pub const AUTHORIZATION: &str = "Authorization";
/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "Content-Type";
/// `Accept` header name.
pub const ACCEPT: &str = "Accept";
/// `User-Agent` header name.
pub const USER_AGENT: &str = "User-Agent";
/// `Set-Cookie` response header name.
pub const SET_COOKIE: &str = "Set-Cookie";

/// `Basic` authorization scheme.
pub const BASIC: &str = "Basic";
/// `Bearer` authorization scheme.
pub const BEARER: &str = "Bearer";

/// `Authorization` value for a bearer token: `Bearer <token>`.
#[must_use]
pub fn bearer(token: impl AsRef<str>) -> String {
    format!("{BEARER} {}", token.as_ref())
}

/// `Authorization` value for basic credentials: `Basic <base64(user:pass)>`.
#[must_use]
pub fn basic(username: impl AsRef<str>, password: impl AsRef<str>) -> String {
    let credentials = format!("{}:{}", username.as_ref(), password.as_ref());
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
    format!("{BASIC} {encoded}")
}

/// Merge `overrides` into `base`, replacing values for keys both contain.
pub fn merge(base: &mut Header, overrides: impl IntoIterator<Item = (String, String)>) {
    base.extend(overrides);
}
