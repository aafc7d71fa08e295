use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use croptrace_canonical::RecordKind;

type HmacSha256 = Hmac<Sha256>;

/// Domain separator for payload signatures: `b"croptrace:payload:v1\0"`.
const PAYLOAD_DOMAIN_SEPARATOR: &[u8] = b"croptrace:payload:v1\0";

/// Shared-secret HMAC signer for payload envelopes.
///
/// Signatures are deterministic: the tag is a pure function of
/// `(kind, version, canonical bytes)` and the secret, with no randomness or
/// clock input, so verification is reproducible anywhere the secret is
/// known. A public-key scheme can replace this behind the same surface if
/// multi-party trust is ever required.
pub struct PayloadSigner {
    secret: Vec<u8>,
}

impl PayloadSigner {
    /// Creates a signer over the shared secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Computes the integrity tag for a record's canonical bytes.
    ///
    /// Formula: `HMAC-SHA256(secret, domain_separator || kind || ':' ||
    /// version || ':' || canonical_bytes)`, encoded base64url without
    /// padding.
    pub fn sign(&self, kind: RecordKind, version: u32, canonical: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(PAYLOAD_DOMAIN_SEPARATOR);
        mac.update(kind.as_str().as_bytes());
        mac.update(b":");
        mac.update(version.to_string().as_bytes());
        mac.update(b":");
        mac.update(canonical);
        let tag = mac.finalize().into_bytes();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(tag)
    }

    /// Checks a signature by recomputation and constant-time comparison.
    ///
    /// A mismatch is an outcome, not an error: callers classify the payload
    /// as untrusted rather than aborting the scan pipeline.
    pub fn verify(
        &self,
        kind: RecordKind,
        version: u32,
        canonical: &[u8],
        signature: &str,
    ) -> bool {
        let expected = self.sign(kind, version, canonical);
        expected.as_bytes().ct_eq(signature.as_bytes()).into()
    }
}
