//! Proof key for the provider's code exchange (RFC 7636, `S256`).

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

use rentline_core::{AppError, AppResult};

/// Challenge method name the provider expects for SHA-256 challenges.
pub const PKCE_CHALLENGE_METHOD: &str = "s256";

/// Verifier kept server-side until the callback, and the challenge sent upfront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkcePair {
    verifier: String,
    challenge: String,
}

impl PkcePair {
    /// Generates a fresh 43-character verifier.
    pub fn generate() -> AppResult<Self> {
        let mut bytes = [0u8; 32];
        getrandom::fill(&mut bytes).map_err(|error| {
            AppError::Internal(format!("failed to generate code verifier: {error}"))
        })?;

        Ok(Self::from_verifier(URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Rebuilds the pair from a stored verifier.
    #[must_use]
    pub fn from_verifier(verifier: String) -> Self {
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }

    /// Returns the secret verifier.
    #[must_use]
    pub fn verifier(&self) -> &str {
        &self.verifier
    }

    /// Returns the challenge derived from the verifier.
    #[must_use]
    pub fn challenge(&self) -> &str {
        &self.challenge
    }

    /// Consumes the pair, keeping the verifier.
    #[must_use]
    pub fn into_verifier(self) -> String {
        self.verifier
    }
}

#[cfg(test)]
mod tests {
    use super::PkcePair;

    #[test]
    fn challenge_matches_rfc_7636_example() {
        let pair = PkcePair::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_owned());

        assert_eq!(pair.challenge(), "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn generated_verifiers_are_unique_and_url_safe() {
        let first = PkcePair::generate().unwrap_or_else(|error| panic!("{error}"));
        let second = PkcePair::generate().unwrap_or_else(|error| panic!("{error}"));

        assert_ne!(first.verifier(), second.verifier());
        assert_eq!(first.verifier().len(), 43);
        assert!(
            first
                .verifier()
                .chars()
                .all(|character| character.is_ascii_alphanumeric() || "-_".contains(character))
        );
    }
}
