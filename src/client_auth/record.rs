//! Certificate-status record produced by the TLS terminator.

use serde::{Deserialize, Serialize};

/// Value of `certPresented` when the client sent a certificate.
pub const CERT_PRESENTED: &str = "1";

/// Verification result for the client certificate of one connection.
///
/// Field names follow the edge's JSON form (`certPresented`, `certSubjectDN`,
/// ...). Every field is optional; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientAuthRecord {
    /// `"1"` when a certificate was presented, `"0"` otherwise.
    #[serde(rename = "certPresented")]
    pub cert_presented: Option<String>,

    /// `SUCCESS`, `NONE` or `FAILED:<reason>`.
    #[serde(rename = "certVerified")]
    pub cert_verified: Option<String>,

    /// Separate verification status. Overrides `cert_verified` in the
    /// outbound header when non-empty.
    #[serde(rename = "certVerify")]
    pub cert_verify: Option<String>,

    #[serde(rename = "certSubjectDN")]
    pub cert_subject_dn: Option<String>,

    #[serde(rename = "certIssuerDN")]
    pub cert_issuer_dn: Option<String>,

    #[serde(rename = "certSubjectDNLegacy")]
    pub cert_subject_dn_legacy: Option<String>,

    #[serde(rename = "certIssuerDNLegacy")]
    pub cert_issuer_dn_legacy: Option<String>,

    #[serde(rename = "certSerial")]
    pub cert_serial: Option<String>,

    #[serde(rename = "certIssuerSerial")]
    pub cert_issuer_serial: Option<String>,

    #[serde(rename = "certFingerprintSHA1")]
    pub cert_fingerprint_sha1: Option<String>,

    /// Validity start, e.g. `Dec 22 19:39:00 2018 GMT`.
    #[serde(rename = "certNotBefore")]
    pub cert_not_before: Option<String>,

    /// Validity end.
    #[serde(rename = "certNotAfter")]
    pub cert_not_after: Option<String>,
}

impl ClientAuthRecord {
    /// Parse a record from its JSON form.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// True only for an exact `certPresented == "1"`.
    pub fn is_certificate_presented(&self) -> bool {
        self.cert_presented.as_deref() == Some(CERT_PRESENTED)
    }
}

/// Borrow a field's value if it is present and non-empty.
pub(crate) fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}
