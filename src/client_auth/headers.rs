//! Header names sent to the origin and the ordered override set.
//!
//! Names mirror nginx's `$ssl_client_*` forwarding convention so existing
//! origin configurations keep working. HTTP field names are case-insensitive;
//! they are held here in lowercase.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};

pub const X_SSL_CLIENT_VERIFY: HeaderName = HeaderName::from_static("x-ssl-client-verify");
pub const X_SSL_CLIENT_DN: HeaderName = HeaderName::from_static("x-ssl-client-dn");
pub const X_SSL_CLIENT_ISSUER: HeaderName = HeaderName::from_static("x-ssl-client-issuer");
pub const X_SSL_CLIENT_DN_LEGACY: HeaderName = HeaderName::from_static("x-ssl-client-dn-legacy");
pub const X_SSL_CLIENT_ISSUER_LEGACY: HeaderName =
    HeaderName::from_static("x-ssl-client-issuer-legacy");
pub const X_SSL_CLIENT_SERIAL: HeaderName = HeaderName::from_static("x-ssl-client-serial");
pub const X_SSL_CLIENT_ISSUER_SERIAL: HeaderName =
    HeaderName::from_static("x-ssl-client-issuer-serial");
pub const X_SSL_CLIENT_FINGERPRINT: HeaderName =
    HeaderName::from_static("x-ssl-client-fingerprint");
pub const X_SSL_CLIENT_NOT_BEFORE: HeaderName = HeaderName::from_static("x-ssl-client-notbefore");
pub const X_SSL_CLIENT_NOT_AFTER: HeaderName = HeaderName::from_static("x-ssl-client-notafter");

/// Prefix shared by every header this crate emits.
pub const X_SSL_CLIENT_PREFIX: &str = "x-ssl-client-";

/// Header overrides computed for one request.
///
/// Insertion order is kept. Setting a name that is already present replaces
/// its value in place, so the entry keeps its first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderOverrideSet {
    entries: Vec<(HeaderName, String)>,
}

impl HeaderOverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a header value.
    pub fn set(&mut self, name: HeaderName, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &HeaderName) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &HeaderName) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &str)> {
        self.entries.iter().map(|(n, v)| (n, v.as_str()))
    }

    /// Apply every override onto `headers`, replacing all existing values
    /// of the same name.
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        for (name, value) in &self.entries {
            headers.insert(name.clone(), encode_value(value));
        }
    }
}

/// Encode a string as a header value, dropping control characters HTTP does
/// not allow in field values. Never fails.
pub fn encode_value(value: &str) -> HeaderValue {
    if let Ok(v) = HeaderValue::from_bytes(value.as_bytes()) {
        return v;
    }

    let cleaned: Vec<u8> = value
        .bytes()
        .filter(|&b| b == b'\t' || (b >= 0x20 && b != 0x7f))
        .collect();

    HeaderValue::from_bytes(&cleaned).unwrap_or_else(|_| HeaderValue::from_static(""))
}
