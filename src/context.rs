use crate::scope::Scope;
use compact_str::CompactString;
use iso8601_timestamp::Timestamp;
use std::{collections::HashMap, sync::Mutex, time::Duration};
use typed_builder::TypedBuilder;

const DEFAULT_CONTEXT_TTL: Duration = Duration::from_secs(10 * 60);

/// Correlation key binding an authorization-endpoint interaction to its later
/// token-endpoint interaction.
///
/// Derived deterministically from the identifying fields both interactions
/// share: the client id plus a per-authorization nonce (the issued
/// authorization code). Equal inputs always rebuild the same key; this
/// derivation is a fixed contract, not an implementation detail.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ContextKey {
    client_id: CompactString,
    nonce: CompactString,
}

impl ContextKey {
    #[must_use]
    pub fn new(client_id: &str, nonce: &str) -> Self {
        Self {
            client_id: client_id.into(),
            nonce: nonce.into(),
        }
    }
}

/// State carried over from the authorization step: the granted scope, the
/// client's `state`, and an open property bag (e.g. the issued code).
#[derive(Clone, Debug)]
pub struct Context {
    key: ContextKey,
    scope: Option<Scope>,
    state: Option<String>,
    properties: HashMap<String, String>,
    expires_at: Timestamp,
}

impl Context {
    #[must_use]
    pub fn key(&self) -> &ContextKey {
        &self.key
    }

    #[must_use]
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        !self
            .expires_at
            .duration_since(Timestamp::now_utc())
            .is_positive()
    }
}

/// Correlates authorization-endpoint interactions with their later
/// token-endpoint counterparts. First write wins per key; reads past the
/// expiry read as absence.
#[derive(Debug, TypedBuilder)]
pub struct ContextStore {
    #[builder(default = DEFAULT_CONTEXT_TTL)]
    ttl: Duration,
    #[builder(default, setter(skip))]
    store: Mutex<HashMap<ContextKey, Context>>,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ContextStore {
    /// Create a context for the key unless one already exists; either way the
    /// live context is returned.
    pub fn save(&self, key: ContextKey, scope: Option<Scope>, state: Option<&str>) -> Context {
        let mut guard = self.store.lock().unwrap();
        let context = guard.entry(key).or_insert_with_key(|key| Context {
            key: key.clone(),
            scope,
            state: state.map(ToOwned::to_owned),
            properties: HashMap::new(),
            expires_at: Timestamp::now_utc() + self.ttl,
        });

        context.clone()
    }

    /// Like [`save`](Self::save), additionally merging one property into the
    /// live context under the same lock.
    pub fn save_with_property(
        &self,
        key: ContextKey,
        scope: Option<Scope>,
        state: Option<&str>,
        property: (&str, &str),
    ) -> Context {
        let mut guard = self.store.lock().unwrap();
        let context = guard.entry(key).or_insert_with_key(|key| Context {
            key: key.clone(),
            scope,
            state: state.map(ToOwned::to_owned),
            properties: HashMap::new(),
            expires_at: Timestamp::now_utc() + self.ttl,
        });

        let (name, value) = property;
        context.properties.insert(name.to_owned(), value.to_owned());

        context.clone()
    }

    #[must_use]
    pub fn retrieve(&self, key: &ContextKey) -> Option<Context> {
        let mut guard = self.store.lock().unwrap();

        let expired = guard.get(key).map_or(false, Context::is_expired);
        if expired {
            debug!(?key, "context expired");
            guard.remove(key);
            return None;
        }

        guard.get(key).cloned()
    }

    pub fn destroy(&self, key: &ContextKey) -> Option<Context> {
        self.store.lock().unwrap().remove(key)
    }
}
