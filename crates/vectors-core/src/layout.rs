//! Test-vector directory layout and well-known file names
//!
//! Downstream test cases open artifacts by fixed path, so every fixture
//! relocates its output into one of the directories below before returning.

use std::path::{Path, PathBuf};

/// Default root of the test-vector scratch area.
pub const DEFAULT_ROOT: &str = "/test-vectors";

/// Known-good PSA profile 2 claims template.
pub const GOOD_CLAIMS_TEMPLATE: &str = "psa-claims-profile-2-integ.json";
/// Duplicate of the claims template with a two-element nonce.
pub const MULTI_NONCE_TEMPLATE: &str = "psa-claims-profile-2-integ-invalid-multi-nonce.json";
/// Duplicate of the claims template with a distorted BL measurement.
pub const BAD_SWCOMP_TEMPLATE: &str = "psa-claims-profile-2-integ-bad-swcomp.json";
/// EC P-256 signing key used by `evcli`.
pub const SIGNING_KEY: &str = "ec-p256.jwk";
/// COSE signing key used by `go-cose-cli`, relative to `EVCLI_TEMPLATES`.
pub const COSE_SIGNING_KEY: &str = "ec256.json";

pub const GOOD_EVIDENCE: &str = "psa-good-evidence.cbor";
pub const BAD_SWCOMP_EVIDENCE: &str = "psa-bad-swcomp-evidence.cbor";
pub const MULTI_NONCE_EVIDENCE: &str = "psa-invalid-multi-nonce-evidence.cbor";
/// Unsigned PSA token produced by `go-psa`; removed once signed.
pub const UNSIGNED_TOKEN: &str = "psa-token.cbor";

pub const CORIM_FULL: &str = "corim-full.cbor";
pub const COMID_IAKPUB: &str = "comid-psa-integ-iakpub.cbor";
pub const COMID_REFVAL: &str = "comid-psa-refval.cbor";

/// CoMID/CoRIM templates, relative to `COCLI_TEMPLATES`.
pub const COMID_IAKPUB_TEMPLATE: &str = "data/templates/comid-psa-integ-iakpub.json";
pub const COMID_REFVAL_TEMPLATE: &str = "data/templates/comid-psa-refval.json";
pub const CORIM_FULL_TEMPLATE: &str = "data/templates/corim-full.json";

/// Directory layout under the test-vector root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorLayout {
    root: PathBuf,
}

impl VectorLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination for CoRIM/CoMID provisioning artifacts.
    pub fn provisioning_cbor(&self) -> PathBuf {
        self.root.join("provisioning").join("cbor")
    }

    /// Destination for evidence tokens.
    pub fn verification_cbor(&self) -> PathBuf {
        self.root.join("verification").join("cbor")
    }

    /// Source and duplicated claims templates.
    pub fn verification_json(&self) -> PathBuf {
        self.root.join("verification").join("json")
    }

    /// JWK signing keys.
    pub fn verification_keys(&self) -> PathBuf {
        self.root.join("verification").join("keys")
    }

    pub fn claims_template(&self) -> PathBuf {
        self.verification_json().join(GOOD_CLAIMS_TEMPLATE)
    }

    pub fn signing_key(&self) -> PathBuf {
        self.verification_keys().join(SIGNING_KEY)
    }

    /// Stale evidence artifact removed before provisioning tests.
    ///
    /// It lives in the provisioning directory, not the verification one.
    pub fn stale_evidence(&self) -> PathBuf {
        self.provisioning_cbor().join(GOOD_EVIDENCE)
    }
}

impl Default for VectorLayout {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_matches_fixed_paths() {
        let layout = VectorLayout::default();
        assert_eq!(
            layout.provisioning_cbor(),
            PathBuf::from("/test-vectors/provisioning/cbor")
        );
        assert_eq!(
            layout.verification_cbor(),
            PathBuf::from("/test-vectors/verification/cbor")
        );
        assert_eq!(
            layout.verification_json(),
            PathBuf::from("/test-vectors/verification/json")
        );
        assert_eq!(
            layout.verification_keys(),
            PathBuf::from("/test-vectors/verification/keys")
        );
    }

    #[test]
    fn test_stale_evidence_path() {
        let layout = VectorLayout::new("/tmp/tv");
        assert_eq!(
            layout.stale_evidence(),
            PathBuf::from("/tmp/tv/provisioning/cbor/psa-good-evidence.cbor")
        );
        assert_eq!(
            layout.signing_key(),
            PathBuf::from("/tmp/tv/verification/keys/ec-p256.jwk")
        );
    }
}
