use super::{GrantFlows, TokenResponse, TokenType};
use crate::{
    context::{Context, ContextKey},
    error::{Error, Result},
    params::{self, request, response, RequestParameter, RequestView, ResponseParameter},
    scope::Scope,
    token::TokenIssuer,
    Endpoint, Grant, ResponseType,
};
use serde::Serialize;
use std::borrow::Cow;
use subtle::ConstantTimeEq;
use typed_builder::TypedBuilder;

/// Requests understood by the authorization-code grant, one per endpoint.
pub enum Request<'a> {
    Authorization(AuthorizationRequest<'a>),
    Token(TokenRequest<'a>),
}

/// Responses produced by the authorization-code grant.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response<'a> {
    Authorization(AuthorizationResponse<'a>),
    Token(TokenResponse<'a>),
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct AuthorizationRequest<'a> {
    #[builder(setter(into))]
    pub response_type: request::ResponseType<'a>,
    #[builder(setter(into))]
    pub client_id: request::ClientId<'a>,
    #[builder(default, setter(into))]
    pub redirect_uri: request::RedirectUri<'a>,
    #[builder(default, setter(into))]
    pub scope: request::Scope<'a>,
    #[builder(default, setter(into))]
    pub state: request::State<'a>,
}

impl AuthorizationRequest<'_> {
    pub fn validate(&self) -> Result<()> {
        let params: [&dyn RequestParameter; 5] = [
            &self.response_type,
            &self.client_id,
            &self.redirect_uri,
            &self.scope,
            &self.state,
        ];
        params::validate_request(
            &params,
            &RequestView::default(),
            Grant::AuthorizationCode,
            Endpoint::Authorization,
        )
    }
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct TokenRequest<'a> {
    #[builder(setter(into))]
    pub grant_type: request::GrantType<'a>,
    #[builder(setter(into))]
    pub code: request::Code<'a>,
    #[builder(setter(into))]
    pub redirect_uri: request::RedirectUri<'a>,
    #[builder(setter(into))]
    pub client_id: request::ClientId<'a>,
    #[builder(default)]
    pub client_credential: request::ClientCredential<'a>,
}

impl TokenRequest<'_> {
    pub fn validate(&self) -> Result<()> {
        let view = RequestView {
            client_credential: Some(&self.client_credential),
        };
        let params: [&dyn RequestParameter; 5] = [
            &self.grant_type,
            &self.code,
            &self.redirect_uri,
            &self.client_id,
            &self.client_credential,
        ];
        params::validate_request(&params, &view, Grant::AuthorizationCode, Endpoint::Token)
    }
}

/// Authorization response: the issued code plus the echoed `state`.
#[derive(Clone, Debug, Serialize)]
pub struct AuthorizationResponse<'a> {
    pub code: Cow<'a, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Cow<'a, str>>,
}

impl AuthorizationResponse<'_> {
    pub fn validate(&self, context: Option<&Context>) -> Result<()> {
        let code = response::Code::new(&*self.code);
        let state = match &self.state {
            Some(state) => response::State::new(&**state),
            None => response::State::absent(),
        };

        let params: [&dyn ResponseParameter; 2] = [&code, &state];
        params::validate_response(
            &params,
            Grant::AuthorizationCode,
            Endpoint::Authorization,
            context,
        )
    }
}

pub fn handle<'a, I>(flows: &GrantFlows<'_, I>, request: Request<'a>) -> Result<Response<'a>>
where
    I: TokenIssuer,
{
    match request {
        Request::Authorization(request) => {
            handle_authorization(flows, request).map(Response::Authorization)
        }
        Request::Token(request) => handle_token(flows, request).map(Response::Token),
    }
}

/// Authorization endpoint: resource-owner authentication and consent are the
/// caller's concern and assumed settled by the time this runs.
#[instrument(skip_all)]
fn handle_authorization<'a, I>(
    flows: &GrantFlows<'_, I>,
    request: AuthorizationRequest<'a>,
) -> Result<AuthorizationResponse<'a>>
where
    I: TokenIssuer,
{
    request.validate()?;

    let client_id = request.client_id.require()?;
    let scope = request
        .scope
        .as_deref()
        .filter(|scope| !scope.is_empty())
        .map(|scope| scope.parse::<Scope>().unwrap());

    let client = super::authorize_client(
        flows.clients,
        Grant::AuthorizationCode,
        ResponseType::Code,
        client_id,
        request.response_type.require()?,
        request.redirect_uri.as_deref(),
        scope.as_ref(),
    )?;

    let code = flows.codes.issue(
        &client.client_id,
        request.redirect_uri.as_deref(),
        scope.as_ref(),
    );

    let key = ContextKey::new(&client.client_id, code.value());
    let context = flows.contexts.save_with_property(
        key,
        scope,
        request.state.as_deref(),
        (response::Code::NAME, code.value()),
    );

    let response = AuthorizationResponse {
        code: Cow::Owned(code.value().to_owned()),
        state: request.state.clone().into_inner(),
    };
    response.validate(Some(&context))?;

    debug!(client_id = %client.client_id, "authorization code issued");

    Ok(response)
}

#[instrument(skip_all)]
fn handle_token<'a, I>(
    flows: &GrantFlows<'_, I>,
    request: TokenRequest<'a>,
) -> Result<TokenResponse<'a>>
where
    I: TokenIssuer,
{
    request.validate()?;

    let grant_type = request.grant_type.require()?;
    if grant_type != Grant::AuthorizationCode.as_ref() {
        return Err(Error::UnsupportedGrantType {
            value: grant_type.to_owned(),
        });
    }

    let client_id = request.client_id.require()?;
    let code_value = request.code.require()?;
    let redirect_uri = request.redirect_uri.require()?;

    let key = ContextKey::new(client_id, code_value);
    let context = flows
        .contexts
        .retrieve(&key)
        .ok_or(Error::ContextNotSetUp)?;

    let client = flows
        .clients
        .retrieve(client_id)
        .ok_or_else(|| Error::ClientNotRegistered {
            client_id: client_id.to_owned(),
        })?;

    if !client.allows_grant(Grant::AuthorizationCode) {
        return Err(Error::GrantTypeNotAllowed {
            client_id: client.client_id.clone(),
            grant: Grant::AuthorizationCode,
        });
    }

    if !client.authenticate(
        request.client_credential.client_secret(),
        Some(redirect_uri),
    ) {
        debug!(client_id = %client.client_id, "client failed to authenticate");
        return Err(Error::ClientAuthenticationFailed {
            client_id: client.client_id.clone(),
        });
    }

    let code = flows.codes.consume(code_value)?;

    // The consumed code must have been issued to this client, for this
    // redirect URI. The id comparison is constant time.
    let client_matches: bool = code
        .client_id()
        .as_bytes()
        .ct_eq(client.client_id.as_bytes())
        .into();
    let redirect_matches = code
        .redirect_uri()
        .map_or(true, |issued| issued == redirect_uri);

    if !client_matches || !redirect_matches {
        debug!(client_id = %client.client_id, "code was issued to a different request");
        return Err(Error::AuthorizationFailed);
    }

    let access_token = flows.token_issuer.issue_access_token()?;
    let refresh_token = flows.token_issuer.issue_refresh_token()?;

    flows.contexts.destroy(&key);

    let response = TokenResponse {
        access_token: Cow::Owned(access_token.token),
        token_type: TokenType::Bearer,
        expires_in: access_token.expires_in,
        refresh_token: Cow::Owned(refresh_token.token),
        scope: context.scope().cloned(),
    };
    response.validate(Grant::AuthorizationCode, Some(&context))?;

    debug!(client_id = %client.client_id, "token issued");

    Ok(response)
}
