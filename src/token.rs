use crate::{error::Result, secret::SecretGenerator};
use std::time::Duration;
use typed_builder::TypedBuilder;

const DEFAULT_TOKEN_LENGTH: usize = 40;
const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// An issued access token and its lifetime in seconds.
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in: u64,
}

/// An issued refresh token.
#[derive(Clone)]
pub struct RefreshToken {
    pub token: String,
}

/// Produces token values. Values must be unique and unguessable; whether
/// they are opaque strings or structured tokens is up to the implementation.
pub trait TokenIssuer {
    fn issue_access_token(&self) -> Result<AccessToken>;

    fn issue_refresh_token(&self) -> Result<RefreshToken>;
}

/// Reference issuer: opaque random strings with a configured lifetime.
#[derive(Debug, TypedBuilder)]
pub struct RandomTokenIssuer {
    #[builder(default)]
    generator: SecretGenerator,
    #[builder(default = DEFAULT_TOKEN_LENGTH)]
    token_length: usize,
    #[builder(default = DEFAULT_ACCESS_TOKEN_TTL)]
    ttl: Duration,
}

impl Default for RandomTokenIssuer {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TokenIssuer for RandomTokenIssuer {
    fn issue_access_token(&self) -> Result<AccessToken> {
        Ok(AccessToken {
            token: self.generator.generate(self.token_length),
            expires_in: self.ttl.as_secs(),
        })
    }

    fn issue_refresh_token(&self) -> Result<RefreshToken> {
        Ok(RefreshToken {
            token: self.generator.generate(self.token_length),
        })
    }
}
