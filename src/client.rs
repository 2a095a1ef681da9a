use crate::{
    error::{Error, Result},
    scope::Scope,
    secret::SecretGenerator,
    Grant, ResponseType,
};
use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Mutex,
};
use strum::{AsRefStr, Display, EnumString};
use subtle::{Choice, ConstantTimeEq};
use typed_builder::TypedBuilder;
use url::Url;

const DEFAULT_CLIENT_ID_LENGTH: usize = 16;
const DEFAULT_CLIENT_SECRET_LENGTH: usize = 32;

/// How the client authenticates against the token endpoint.
///
/// `None` marks a public client; everything else implies a confidential one.
#[derive(AsRefStr, Clone, Copy, Debug, Default, Display, EnumString, Eq, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum TokenEndpointAuthMethod {
    #[default]
    None,
    ClientSecretPost,
    ClientSecretBasic,
}

impl TokenEndpointAuthMethod {
    #[must_use]
    pub fn is_confidential(self) -> bool {
        self != Self::None
    }
}

/// Descriptive surface a client registers with.
#[derive(Clone, Debug, TypedBuilder)]
pub struct ClientMetadata {
    pub redirect_uris: HashSet<String>,
    #[builder(setter(into))]
    pub client_uri: String,
    #[builder(default)]
    pub token_endpoint_auth_method: TokenEndpointAuthMethod,
    #[builder(default)]
    pub grant_types: HashSet<Grant>,
    #[builder(default)]
    pub response_types: HashSet<ResponseType>,
    #[builder(default)]
    pub client_name: Option<String>,
    #[builder(default)]
    pub logo_uri: Option<String>,
    #[builder(default)]
    pub scope: Option<Scope>,
    #[builder(default)]
    pub contacts: Vec<String>,
    #[builder(default)]
    pub tos_uri: Option<String>,
    #[builder(default)]
    pub policy_uri: Option<String>,
    #[builder(default)]
    pub jwks_uri: Option<String>,
    #[builder(default)]
    pub software_id: Option<String>,
    #[builder(default)]
    pub software_version: Option<String>,
}

/// A registered client. Immutable once issued; update is an extension point
/// of the embedding application, not of this core.
#[derive(Clone)]
pub struct Client {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub metadata: ClientMetadata,
}

impl Client {
    #[must_use]
    pub fn is_confidential(&self) -> bool {
        self.metadata.token_endpoint_auth_method.is_confidential()
    }

    #[must_use]
    pub fn allows_grant(&self, grant: Grant) -> bool {
        self.metadata.grant_types.contains(&grant)
    }

    #[must_use]
    pub fn allows_response_type(&self, response_type: ResponseType) -> bool {
        self.metadata.response_types.contains(&response_type)
    }

    /// Check the presented secret alone.
    ///
    /// A public client has nothing to prove; a confidential client must match
    /// its stored secret, compared in constant time.
    #[must_use]
    pub fn verify_secret(&self, presented: Option<&str>) -> bool {
        if !self.is_confidential() {
            return true;
        }

        let (Some(stored), Some(presented)) = (self.client_secret.as_deref(), presented) else {
            return false;
        };

        stored.as_bytes().ct_eq(presented.as_bytes()).into()
    }

    /// Full client authentication for the code-exchange path: the secret must
    /// match and the presented redirect URI must be one the client registered.
    /// There is no fallback to any registered URI when none is presented.
    #[must_use]
    pub fn authenticate(&self, client_secret: Option<&str>, redirect_uri: Option<&str>) -> bool {
        if !self.is_confidential() {
            return true;
        }

        let uri_registered = redirect_uri
            .map_or(false, |uri| self.metadata.redirect_uris.contains(uri));

        (Choice::from(u8::from(self.verify_secret(client_secret)))
            & Choice::from(u8::from(uri_registered)))
        .into()
    }
}

impl fmt::Debug for Client {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Registry of every client this server issued an identity to.
///
/// All mutations are atomic with respect to their duplicate checks; two
/// racing registrations can never both claim the same redirect URI.
#[derive(Debug, TypedBuilder)]
pub struct ClientRegistry {
    #[builder(default)]
    generator: SecretGenerator,
    #[builder(default = DEFAULT_CLIENT_ID_LENGTH)]
    client_id_length: usize,
    #[builder(default = DEFAULT_CLIENT_SECRET_LENGTH)]
    client_secret_length: usize,
    #[builder(default, setter(skip))]
    clients: Mutex<HashMap<String, Client>>,
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientRegistry {
    /// Register a client, allocating a fresh client id and, for confidential
    /// clients, a secret.
    ///
    /// Fails when any URI is not a syntactically valid absolute URI, when a
    /// redirect URI is already owned by another client, or when the client
    /// URI is already registered.
    #[instrument(skip_all)]
    pub fn register(&self, metadata: ClientMetadata) -> Result<Client> {
        if metadata.redirect_uris.is_empty() {
            return Err(Error::InvalidClientProperty {
                name: "redirect_uris",
                value: String::new(),
            });
        }

        for redirect_uri in &metadata.redirect_uris {
            if Url::parse(redirect_uri).is_err() {
                return Err(Error::InvalidClientProperty {
                    name: "redirect_uris",
                    value: redirect_uri.clone(),
                });
            }
        }

        if Url::parse(&metadata.client_uri).is_err() {
            return Err(Error::InvalidClientProperty {
                name: "client_uri",
                value: metadata.client_uri.clone(),
            });
        }

        let mut guard = self.clients.lock().unwrap();

        for registered in guard.values() {
            if let Some(duplicate) = registered
                .metadata
                .redirect_uris
                .intersection(&metadata.redirect_uris)
                .next()
            {
                debug!(client_id = %registered.client_id, "redirect uri already registered");
                return Err(Error::DuplicateClientProperty {
                    name: "redirect_uris",
                    value: duplicate.clone(),
                });
            }

            if registered.metadata.client_uri == metadata.client_uri {
                debug!(client_id = %registered.client_id, "client uri already registered");
                return Err(Error::DuplicateClientProperty {
                    name: "client_uri",
                    value: metadata.client_uri.clone(),
                });
            }
        }

        let client_id = loop {
            let candidate = self.generator.generate(self.client_id_length);
            if !guard.contains_key(&candidate) {
                break candidate;
            }
        };

        let client_secret = metadata
            .token_endpoint_auth_method
            .is_confidential()
            .then(|| self.generator.generate(self.client_secret_length));

        let client = Client {
            client_id: client_id.clone(),
            client_secret,
            metadata,
        };
        guard.insert(client_id, client.clone());

        debug!(
            client_id = %client.client_id,
            confidential = client.is_confidential(),
            "registered client"
        );

        Ok(client)
    }

    /// Absence is the caller's hard failure, never an implicit default.
    #[must_use]
    pub fn retrieve(&self, client_id: &str) -> Option<Client> {
        self.clients.lock().unwrap().get(client_id).cloned()
    }

    /// Remove a client. Outstanding codes and contexts tied to it are owned
    /// by their stores; invalidating them is the embedder's extension point.
    pub fn unregister(&self, client_id: &str) -> Option<Client> {
        self.clients.lock().unwrap().remove(client_id)
    }
}
