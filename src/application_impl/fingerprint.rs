use crate::application_port::AuthError;
use crate::domain_model::UserId;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Binding digest over a client signal and the user it was issued to.
pub struct Fingerprint<'a> {
    user_id: UserId,
    data: &'a [u8],
}

impl<'a> Fingerprint<'a> {
    pub fn new(user_id: UserId, data: &'a [u8]) -> Self {
        Fingerprint { user_id, data }
    }

    /// SHA-256 of the raw signal followed by the raw user id bytes.
    pub fn hash(&self) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(self.data);
        hasher.update(self.user_id.as_bytes());
        hasher.finalize().to_vec()
    }

    pub fn verify(&self, expected: &[u8]) -> Result<(), AuthError> {
        if bool::from(self.hash().as_slice().ct_eq(expected)) {
            Ok(())
        } else {
            Err(AuthError::FingerprintIncorrect)
        }
    }

    /// Same as `verify`, for the hex form carried inside access credentials.
    pub fn verify_hex(&self, expected: &str) -> Result<(), AuthError> {
        let expected = hex::decode(expected).map_err(|_| AuthError::FingerprintIncorrect)?;
        self.verify(&expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId(uuid::Uuid::from_u128(0x1234))
    }

    #[test]
    fn hash_is_deterministic() {
        let a = Fingerprint::new(user(), b"agent").hash();
        let b = Fingerprint::new(user(), b"agent").hash();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn hash_covers_signal_then_user() {
        let mut hasher = Sha256::new();
        hasher.update(b"agent");
        hasher.update(user().as_bytes());
        let expected = hasher.finalize().to_vec();

        assert_eq!(Fingerprint::new(user(), b"agent").hash(), expected);
    }

    #[test]
    fn hash_depends_on_both_inputs() {
        let base = Fingerprint::new(user(), b"agent").hash();
        let other_signal = Fingerprint::new(user(), b"agent2").hash();
        let other_user = Fingerprint::new(UserId(uuid::Uuid::from_u128(0x1235)), b"agent").hash();
        assert_ne!(base, other_signal);
        assert_ne!(base, other_user);
    }

    #[test]
    fn verify_matches_and_mismatches() {
        let digest = Fingerprint::new(user(), b"agent").hash();
        assert!(Fingerprint::new(user(), b"agent").verify(&digest).is_ok());
        assert!(matches!(
            Fingerprint::new(user(), b"other").verify(&digest),
            Err(AuthError::FingerprintIncorrect)
        ));
        assert!(matches!(
            Fingerprint::new(user(), b"agent").verify(&digest[..16]),
            Err(AuthError::FingerprintIncorrect)
        ));
    }

    #[test]
    fn verify_hex() {
        let fp = Fingerprint::new(user(), b"agent");
        let digest = hex::encode(fp.hash());
        assert!(fp.verify_hex(&digest).is_ok());
        assert!(matches!(
            fp.verify_hex("zz"),
            Err(AuthError::FingerprintIncorrect)
        ));
        assert!(matches!(fp.verify_hex(""), Err(AuthError::FingerprintIncorrect)));
    }
}
