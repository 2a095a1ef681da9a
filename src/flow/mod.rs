use crate::{
    client::{Client, ClientRegistry},
    code::AuthorizationCodeStore,
    context::{Context, ContextStore},
    error::{Error, Result},
    params::{self, response, ResponseParameter},
    scope::Scope,
    token::TokenIssuer,
    Endpoint, Grant, ResponseType,
};
use serde::Serialize;
use std::borrow::Cow;
use strum::AsRefStr;

pub mod authorization_code;
pub mod client_credentials;
pub mod implicit;
pub mod password;

/// How an issued access token is to be presented by the client.
#[derive(AsRefStr, Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[non_exhaustive]
pub enum TokenType {
    Bearer,
}

/// Successful token response, shared by every grant whose tokens leave
/// through the token endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct TokenResponse<'a> {
    pub access_token: Cow<'a, str>,
    pub token_type: TokenType,
    pub expires_in: u64,
    pub refresh_token: Cow<'a, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

impl TokenResponse<'_> {
    pub fn validate(&self, grant: Grant, context: Option<&Context>) -> Result<()> {
        let access_token = response::AccessToken::new(&*self.access_token);
        let token_type = response::TokenType::new(self.token_type.as_ref());
        let expires_in = response::ExpiresIn::new(self.expires_in);
        let refresh_token = response::RefreshToken::new(&*self.refresh_token);
        let scope = match &self.scope {
            Some(scope) => response::Scope::new(scope.to_string()),
            None => response::Scope::absent(),
        };

        let params: [&dyn ResponseParameter; 5] = [
            &access_token,
            &token_type,
            &expires_in,
            &refresh_token,
            &scope,
        ];
        params::validate_response(&params, grant, Endpoint::Token, context)
    }
}

/// The services a grant flow orchestrates, injected by the embedder.
pub struct GrantFlows<'a, I> {
    pub clients: &'a ClientRegistry,
    pub codes: &'a AuthorizationCodeStore,
    pub contexts: &'a ContextStore,
    pub token_issuer: &'a I,
}

impl<I> Clone for GrantFlows<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for GrantFlows<'_, I> {}

/// A decoded request, tagged with the grant flow it belongs to.
pub enum Request<'a> {
    AuthorizationCode(authorization_code::Request<'a>),
    Implicit(implicit::AuthorizationRequest<'a>),
    Password(password::TokenRequest<'a>),
    ClientCredentials(client_credentials::TokenRequest<'a>),
}

/// The matching validated response, ready for the transport to encode.
#[derive(Serialize)]
#[serde(untagged)]
pub enum Response<'a> {
    AuthorizationCode(authorization_code::Response<'a>),
    Implicit(implicit::TokenResponse<'a>),
    Password(TokenResponse<'a>),
    ClientCredentials(TokenResponse<'a>),
}

/// Route a request to its grant flow.
#[instrument(skip_all)]
pub fn dispatch<'a, I>(flows: &GrantFlows<'_, I>, request: Request<'a>) -> Result<Response<'a>>
where
    I: TokenIssuer,
{
    match request {
        Request::AuthorizationCode(request) => {
            authorization_code::handle(flows, request).map(Response::AuthorizationCode)
        }
        Request::Implicit(request) => implicit::handle(flows, request).map(Response::Implicit),
        Request::Password(request) => password::handle(flows, request).map(Response::Password),
        Request::ClientCredentials(request) => {
            client_credentials::handle(flows, request).map(Response::ClientCredentials)
        }
    }
}

/// Checks shared by every authorization-endpoint request: the client must be
/// registered, allowed to run this grant, asking for the expected response
/// type, presenting a registered redirect URI (if any), and staying inside
/// its registered scope.
pub(crate) fn authorize_client(
    registry: &ClientRegistry,
    grant: Grant,
    expected: ResponseType,
    client_id: &str,
    response_type: &str,
    redirect_uri: Option<&str>,
    scope: Option<&Scope>,
) -> Result<Client> {
    let client = registry
        .retrieve(client_id)
        .ok_or_else(|| Error::ClientNotRegistered {
            client_id: client_id.to_owned(),
        })?;

    if response_type != expected.as_ref() {
        debug!(client_id, response_type, "unexpected response_type");
        return Err(Error::InvalidRequestParameter {
            name: crate::params::request::ResponseType::NAME,
            value: Some(response_type.to_owned()),
        });
    }

    if !client.allows_grant(grant) {
        return Err(Error::GrantTypeNotAllowed {
            client_id: client.client_id.clone(),
            grant,
        });
    }

    if !client.allows_response_type(expected) {
        return Err(Error::ResponseTypeNotAllowed {
            client_id: client.client_id.clone(),
            response_type: expected,
        });
    }

    if let Some(redirect_uri) = redirect_uri {
        if !client.metadata.redirect_uris.contains(redirect_uri) {
            debug!(client_id, "redirect uri not registered");
            return Err(Error::InvalidRequestParameter {
                name: crate::params::request::RedirectUri::NAME,
                value: Some(redirect_uri.to_owned()),
            });
        }
    }

    if let (Some(scope), Some(registered)) = (scope, client.metadata.scope.as_ref()) {
        if !registered.can_perform(scope) {
            debug!(client_id, "requested scope exceeds the registered scope");
            return Err(Error::ScopeNotAllowed {
                scope: scope.to_string(),
            });
        }
    }

    Ok(client)
}
