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

/// Token request of the client-credentials grant: the client asks for tokens
/// on its own behalf, no resource owner involved.
#[derive(Clone, Debug, TypedBuilder)]
pub struct TokenRequest<'a> {
    #[builder(setter(into))]
    pub grant_type: request::GrantType<'a>,
    #[builder(setter(into))]
    pub client_id: request::ClientId<'a>,
    #[builder(default)]
    pub client_credential: request::ClientCredential<'a>,
    #[builder(default, setter(into))]
    pub scope: request::Scope<'a>,
}

impl TokenRequest<'_> {
    pub fn validate(&self) -> Result<()> {
        let view = RequestView {
            client_credential: Some(&self.client_credential),
        };
        let params: [&dyn RequestParameter; 4] = [
            &self.grant_type,
            &self.client_id,
            &self.client_credential,
            &self.scope,
        ];
        params::validate_request(&params, &view, Grant::ClientCredentials, Endpoint::Token)
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
    if grant_type != Grant::ClientCredentials.as_ref() {
        return Err(Error::UnsupportedGrantType {
            value: grant_type.to_owned(),
        });
    }

    let client_id = request.client_id.require()?;
    let client = flows
        .clients
        .retrieve(client_id)
        .ok_or_else(|| Error::ClientNotRegistered {
            client_id: client_id.to_owned(),
        })?;

    if !client.allows_grant(Grant::ClientCredentials) {
        return Err(Error::GrantTypeNotAllowed {
            client_id: client.client_id.clone(),
            grant: Grant::ClientCredentials,
        });
    }

    // There is no redirect URI in this flow, so authentication reduces to
    // the constant-time secret check.
    if !client.verify_secret(request.client_credential.client_secret()) {
        debug!(client_id = %client.client_id, "client failed to authenticate");
        return Err(Error::ClientAuthenticationFailed {
            client_id: client.client_id.clone(),
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
    response.validate(Grant::ClientCredentials, None)?;

    debug!(client_id = %client.client_id, "token issued");

    Ok(response)
}
