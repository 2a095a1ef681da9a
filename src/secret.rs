use rand::{rngs::OsRng, CryptoRng, Rng, RngCore};
use std::{borrow::Cow, fmt, sync::Mutex};

const ALPHANUMERIC: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Randomness source acceptable for credential generation.
///
/// Blanket-implemented for every cryptographically secure generator; a
/// non-`CryptoRng` source does not satisfy the bound, so plugging one in is
/// a compile error rather than a runtime weakness.
pub trait SecretSource: RngCore + CryptoRng + Send {}

impl<T> SecretSource for T where T: RngCore + CryptoRng + Send {}

/// Generator for client ids, client secrets, authorization codes and tokens.
///
/// Samples uniformly from a configurable alphabet; the length is chosen per
/// call since every credential kind carries its own length requirement.
pub struct SecretGenerator {
    alphabet: Cow<'static, str>,
    source: Mutex<Box<dyn SecretSource>>,
}

impl SecretGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::from_source(OsRng)
    }

    #[must_use]
    pub fn from_source(source: impl SecretSource + 'static) -> Self {
        Self {
            alphabet: Cow::Borrowed(ALPHANUMERIC),
            source: Mutex::new(Box::new(source)),
        }
    }

    /// Replace the sampling alphabet.
    ///
    /// # Panics
    ///
    /// Panics if the alphabet is empty or contains non-ASCII characters.
    #[must_use]
    pub fn with_alphabet(mut self, alphabet: impl Into<Cow<'static, str>>) -> Self {
        let alphabet = alphabet.into();
        assert!(
            !alphabet.is_empty() && alphabet.is_ascii(),
            "alphabet must be non-empty ASCII"
        );

        self.alphabet = alphabet;
        self
    }

    #[must_use]
    pub fn generate(&self, length: usize) -> String {
        let alphabet = self.alphabet.as_bytes();
        let source = &mut *self.source.lock().unwrap();

        (0..length)
            .map(|_| {
                let index = source.gen_range(0..alphabet.len());
                char::from(alphabet[index])
            })
            .collect()
    }
}

impl Default for SecretGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SecretGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("alphabet", &self.alphabet)
            .finish_non_exhaustive()
    }
}
