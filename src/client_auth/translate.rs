//! Decision logic: certificate-status record → header overrides.

use axum::http::header::HeaderName;

use super::headers::*;
use super::record::{non_empty, ClientAuthRecord};

pub const VERIFY_SUCCESS: &str = "SUCCESS";
pub const VERIFY_NONE: &str = "NONE";
pub const VERIFY_FAILED_PREFIX: &str = "FAILED:";
pub const UNKNOWN_REASON: &str = "Unknown reason";

/// Compute the header overrides for one request.
///
/// Total over its input: an absent record, or one without a presented
/// certificate, yields `X-SSL-Client-Verify: NONE` and nothing else.
pub fn translate(record: Option<&ClientAuthRecord>) -> HeaderOverrideSet {
    let mut overrides = HeaderOverrideSet::new();

    let Some(record) = record.filter(|r| r.is_certificate_presented()) else {
        overrides.set(X_SSL_CLIENT_VERIFY, VERIFY_NONE);
        return overrides;
    };

    overrides.set(X_SSL_CLIENT_VERIFY, verify_status(record));

    // Order matters: certVerify replaces the status computed above.
    let details: [(HeaderName, &Option<String>); 10] = [
        (X_SSL_CLIENT_DN, &record.cert_subject_dn),
        (X_SSL_CLIENT_ISSUER, &record.cert_issuer_dn),
        (X_SSL_CLIENT_DN_LEGACY, &record.cert_subject_dn_legacy),
        (X_SSL_CLIENT_ISSUER_LEGACY, &record.cert_issuer_dn_legacy),
        (X_SSL_CLIENT_SERIAL, &record.cert_serial),
        (X_SSL_CLIENT_ISSUER_SERIAL, &record.cert_issuer_serial),
        (X_SSL_CLIENT_FINGERPRINT, &record.cert_fingerprint_sha1),
        (X_SSL_CLIENT_VERIFY, &record.cert_verify),
        (X_SSL_CLIENT_NOT_BEFORE, &record.cert_not_before),
        (X_SSL_CLIENT_NOT_AFTER, &record.cert_not_after),
    ];

    for (name, source) in details {
        if let Some(value) = non_empty(source) {
            overrides.set(name, value);
        }
    }

    overrides
}

/// `SUCCESS` or `FAILED:<reason>` for a presented certificate.
fn verify_status(record: &ClientAuthRecord) -> String {
    match non_empty(&record.cert_verified) {
        Some(VERIFY_SUCCESS) => VERIFY_SUCCESS.to_string(),
        Some(reason) if reason.starts_with(VERIFY_FAILED_PREFIX) => reason.to_string(),
        Some(reason) => format!("{VERIFY_FAILED_PREFIX}{reason}"),
        None => format!("{VERIFY_FAILED_PREFIX}{UNKNOWN_REASON}"),
    }
}
