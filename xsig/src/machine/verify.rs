use crate::machine::der::RAW_SIGNATURE_LEN;
use crate::machine::stack::COMPRESSED_PUBKEY_LEN;
use p256::ecdsa::signature::Verifier;
use p256::ecdsa::{Signature, VerifyingKey};

/// Verifies ECDSA signatures over NIST P-256.
///
/// The message is passed verbatim; any hashing is the verifier's
/// responsibility. The interpreter consults this as an oracle and treats every
/// failure mode as a plain reject.
pub trait SignatureVerifier {
    /// Returns true iff `raw_sig` is a valid signature over `msg` under `pubkey`.
    fn verify(
        &self,
        msg: &[u8],
        raw_sig: &[u8; RAW_SIGNATURE_LEN],
        pubkey: &[u8; COMPRESSED_PUBKEY_LEN],
    ) -> bool;
}

impl<T: SignatureVerifier + ?Sized> SignatureVerifier for &T {
    fn verify(
        &self,
        msg: &[u8],
        raw_sig: &[u8; RAW_SIGNATURE_LEN],
        pubkey: &[u8; COMPRESSED_PUBKEY_LEN],
    ) -> bool {
        (**self).verify(msg, raw_sig, pubkey)
    }
}

/// Production verifier backed by the [p256] crate.
///
/// Messages are hashed with SHA-256 as part of verification.
#[derive(Debug, Default, Clone, Copy)]
pub struct P256Verifier;

impl SignatureVerifier for P256Verifier {
    fn verify(
        &self,
        msg: &[u8],
        raw_sig: &[u8; RAW_SIGNATURE_LEN],
        pubkey: &[u8; COMPRESSED_PUBKEY_LEN],
    ) -> bool {
        let key = match VerifyingKey::from_sec1_bytes(pubkey) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature = match Signature::from_slice(raw_sig) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        key.verify(msg, &signature).is_ok()
    }
}
