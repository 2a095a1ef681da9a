use crate::{
    error::{Error, Result},
    scope::Scope,
    secret::SecretGenerator,
};
use iso8601_timestamp::Timestamp;
use std::{collections::HashMap, fmt, sync::Mutex, time::Duration};
use typed_builder::TypedBuilder;

const DEFAULT_CODE_LENGTH: usize = 32;
const DEFAULT_CODE_TTL: Duration = Duration::from_secs(10 * 60);

/// A single-use authorization code together with the facts of the request it
/// was issued for, needed to vet the later token request.
#[derive(Clone)]
pub struct AuthorizationCode {
    value: String,
    client_id: String,
    redirect_uri: Option<String>,
    scope: Option<Scope>,
    expires_at: Timestamp,
}

impl AuthorizationCode {
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    #[must_use]
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        !self
            .expires_at
            .duration_since(Timestamp::now_utc())
            .is_positive()
    }
}

impl fmt::Debug for AuthorizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("value", &"[redacted]")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Issues authorization codes and consumes each at most once.
#[derive(Debug, TypedBuilder)]
pub struct AuthorizationCodeStore {
    #[builder(default)]
    generator: SecretGenerator,
    #[builder(default = DEFAULT_CODE_LENGTH)]
    code_length: usize,
    #[builder(default = DEFAULT_CODE_TTL)]
    ttl: Duration,
    #[builder(default, setter(skip))]
    store: Mutex<HashMap<String, AuthorizationCode>>,
}

impl Default for AuthorizationCodeStore {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AuthorizationCodeStore {
    /// Generate a fresh unique code bound to the authorizing request.
    #[instrument(skip_all)]
    pub fn issue(
        &self,
        client_id: &str,
        redirect_uri: Option<&str>,
        scope: Option<&Scope>,
    ) -> AuthorizationCode {
        let mut guard = self.store.lock().unwrap();

        let value = loop {
            let candidate = self.generator.generate(self.code_length);
            if !guard.contains_key(&candidate) {
                break candidate;
            }
        };

        let code = AuthorizationCode {
            value: value.clone(),
            client_id: client_id.to_owned(),
            redirect_uri: redirect_uri.map(ToOwned::to_owned),
            scope: scope.cloned(),
            expires_at: Timestamp::now_utc() + self.ttl,
        };
        guard.insert(value, code.clone());

        debug!(client_id, "issued authorization code");

        code
    }

    /// Atomically remove and return a code.
    ///
    /// An unknown or already-consumed value is an error, never a no-op; an
    /// expired code counts as consumed.
    #[instrument(skip_all)]
    pub fn consume(&self, value: &str) -> Result<AuthorizationCode> {
        let code = self
            .store
            .lock()
            .unwrap()
            .remove(value)
            .ok_or(Error::AuthorizationFailed)?;

        if code.is_expired() {
            debug!(client_id = %code.client_id, "authorization code expired");
            return Err(Error::AuthorizationCodeExpired);
        }

        Ok(code)
    }
}
