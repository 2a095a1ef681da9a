#![allow(dead_code)]

use rand::{rngs::StdRng, SeedableRng};
use sekisho::{
    client::{Client, ClientMetadata, ClientRegistry, TokenEndpointAuthMethod},
    code::AuthorizationCodeStore,
    context::ContextStore,
    flow::GrantFlows,
    secret::SecretGenerator,
    token::RandomTokenIssuer,
    Grant, ResponseType, Scope,
};
use std::collections::HashSet;

pub const RNG_SEED: u64 = 0xDEAD_BEEF;

pub fn seeded_generator() -> SecretGenerator {
    SecretGenerator::from_source(StdRng::seed_from_u64(RNG_SEED))
}

pub fn redirect_uri(name: &str) -> String {
    format!("https://{name}.example/cb")
}

/// Metadata of a confidential client allowed to run the code and
/// client-credentials grants within `read write`.
pub fn confidential_metadata(name: &str) -> ClientMetadata {
    ClientMetadata::builder()
        .redirect_uris(HashSet::from([redirect_uri(name)]))
        .client_uri(format!("https://{name}.example"))
        .token_endpoint_auth_method(TokenEndpointAuthMethod::ClientSecretBasic)
        .grant_types(HashSet::from([
            Grant::AuthorizationCode,
            Grant::ClientCredentials,
        ]))
        .response_types(HashSet::from([ResponseType::Code]))
        .scope(Some("read write".parse::<Scope>().unwrap()))
        .build()
}

/// Metadata of a public client allowed to run the code, implicit and
/// password grants.
pub fn public_metadata(name: &str) -> ClientMetadata {
    ClientMetadata::builder()
        .redirect_uris(HashSet::from([redirect_uri(name)]))
        .client_uri(format!("https://{name}.example"))
        .grant_types(HashSet::from([
            Grant::AuthorizationCode,
            Grant::Implicit,
            Grant::Password,
            Grant::ClientCredentials,
        ]))
        .response_types(HashSet::from([ResponseType::Code, ResponseType::Token]))
        .scope(Some("read write".parse::<Scope>().unwrap()))
        .build()
}

pub struct Fixture {
    pub clients: ClientRegistry,
    pub codes: AuthorizationCodeStore,
    pub contexts: ContextStore,
    pub token_issuer: RandomTokenIssuer,
}

impl Fixture {
    pub fn generate() -> Self {
        Self {
            clients: ClientRegistry::builder()
                .generator(seeded_generator())
                .build(),
            codes: AuthorizationCodeStore::builder()
                .generator(seeded_generator())
                .build(),
            contexts: ContextStore::builder().build(),
            token_issuer: RandomTokenIssuer::builder()
                .generator(seeded_generator())
                .build(),
        }
    }

    pub fn flows(&self) -> GrantFlows<'_, RandomTokenIssuer> {
        GrantFlows {
            clients: &self.clients,
            codes: &self.codes,
            contexts: &self.contexts,
            token_issuer: &self.token_issuer,
        }
    }

    pub fn register(&self, metadata: ClientMetadata) -> Client {
        self.clients.register(metadata).unwrap()
    }
}
