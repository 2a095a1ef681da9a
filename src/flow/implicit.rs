use super::{GrantFlows, TokenType};
use crate::{
    error::Result,
    params::{self, request, response, RequestParameter, RequestView, ResponseParameter},
    scope::Scope,
    token::TokenIssuer,
    Endpoint, Grant, ResponseType,
};
use serde::Serialize;
use std::borrow::Cow;
use typed_builder::TypedBuilder;

/// The implicit grant has a single step: the token leaves straight through
/// the authorization endpoint.
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
            Grant::Implicit,
            Endpoint::Authorization,
        )
    }
}

/// Token-shaped response from the authorization endpoint. No refresh token
/// is ever issued through the implicit grant.
#[derive(Clone, Debug, Serialize)]
pub struct TokenResponse<'a> {
    pub access_token: Cow<'a, str>,
    pub token_type: TokenType,
    pub expires_in: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Cow<'a, str>>,
}

impl TokenResponse<'_> {
    pub fn validate(&self) -> Result<()> {
        let access_token = response::AccessToken::new(&*self.access_token);
        let token_type = response::TokenType::new(self.token_type.as_ref());
        let expires_in = response::ExpiresIn::new(self.expires_in);
        let scope = match &self.scope {
            Some(scope) => response::Scope::new(scope.to_string()),
            None => response::Scope::absent(),
        };
        let state = match &self.state {
            Some(state) => response::State::new(&**state),
            None => response::State::absent(),
        };

        let params: [&dyn ResponseParameter; 5] =
            [&access_token, &token_type, &expires_in, &scope, &state];
        params::validate_response(&params, Grant::Implicit, Endpoint::Authorization, None)
    }
}

#[instrument(skip_all)]
pub fn handle<'a, I>(
    flows: &GrantFlows<'_, I>,
    request: AuthorizationRequest<'a>,
) -> Result<TokenResponse<'a>>
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
        Grant::Implicit,
        ResponseType::Token,
        client_id,
        request.response_type.require()?,
        request.redirect_uri.as_deref(),
        scope.as_ref(),
    )?;

    let access_token = flows.token_issuer.issue_access_token()?;

    let response = TokenResponse {
        access_token: Cow::Owned(access_token.token),
        token_type: TokenType::Bearer,
        expires_in: access_token.expires_in,
        scope: None,
        state: request.state.clone().into_inner(),
    };
    response.validate()?;

    debug!(client_id = %client.client_id, "access token issued");

    Ok(response)
}
