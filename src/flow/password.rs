use super::{GrantFlows, TokenResponse, TokenType};
use crate::{
    error::{Error, Result},
    params::{self, request, RequestParameter, RequestView},
    scope::Scope,
    token::TokenIssuer,
    Endpoint, Grant,
};
use std::borrow::Cow;
use typed_builder::TypedBuilder;

/// Token request of the resource-owner password credentials grant.
///
/// Verifying the credential pair against whatever user store the embedder
/// runs is the embedder's concern; this core only enforces the parameter
/// contract and issues the tokens.
#[derive(Clone, Debug, TypedBuilder)]
pub struct TokenRequest<'a> {
    #[builder(setter(into))]
    pub grant_type: request::GrantType<'a>,
    #[builder(setter(into))]
    pub username: request::Username<'a>,
    #[builder(setter(into))]
    pub password: request::Password<'a>,
    #[builder(default, setter(into))]
    pub scope: request::Scope<'a>,
}

impl TokenRequest<'_> {
    pub fn validate(&self) -> Result<()> {
        let params: [&dyn RequestParameter; 4] = [
            &self.grant_type,
            &self.username,
            &self.password,
            &self.scope,
        ];
        params::validate_request(
            &params,
            &RequestView::default(),
            Grant::Password,
            Endpoint::Token,
        )
    }
}

#[instrument(skip_all)]
pub fn handle<'a, I>(
    flows: &GrantFlows<'_, I>,
    request: TokenRequest<'a>,
) -> Result<TokenResponse<'a>>
where
    I: TokenIssuer,
{
    request.validate()?;

    let grant_type = request.grant_type.require()?;
    if grant_type != Grant::Password.as_ref() {
        return Err(Error::UnsupportedGrantType {
            value: grant_type.to_owned(),
        });
    }

    let scope = request
        .scope
        .as_deref()
        .filter(|scope| !scope.is_empty())
        .map(|scope| scope.parse::<Scope>().unwrap());

    let access_token = flows.token_issuer.issue_access_token()?;
    let refresh_token = flows.token_issuer.issue_refresh_token()?;

    let response = TokenResponse {
        access_token: Cow::Owned(access_token.token),
        token_type: TokenType::Bearer,
        expires_in: access_token.expires_in,
        refresh_token: Cow::Owned(refresh_token.token),
        scope,
    };
    response.validate(Grant::Password, None)?;

    debug!("token issued");

    Ok(response)
}
