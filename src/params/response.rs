use super::{wire_param, ResponseParameter};
use crate::{context::Context, Endpoint, Grant};

wire_param! {
    /// `access_token`: the issued access token value.
    AccessToken => "access_token";
    /// `token_type`: how the access token is to be presented (e.g. `Bearer`).
    TokenType => "token_type";
    /// `refresh_token`: the issued refresh token value.
    RefreshToken => "refresh_token";
    /// `scope`: the granted scope, space-delimited.
    Scope => "scope";
    /// `state`: the request's `state`, echoed verbatim.
    State => "state";
    /// `code`: the issued authorization code.
    Code => "code";
}

/// Whether the (grant, endpoint) pair describes a token-shaped response.
///
/// The implicit grant returns its token response from the authorization
/// endpoint, which is why this is not simply `endpoint == Token`.
fn is_token_response(grant: Grant, endpoint: Endpoint) -> bool {
    matches!(
        (grant, endpoint),
        (
            Grant::AuthorizationCode | Grant::Password | Grant::ClientCredentials,
            Endpoint::Token
        ) | (Grant::Implicit, Endpoint::Authorization)
    )
}

impl ResponseParameter for AccessToken<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }

    fn is_required(&self, grant: Grant, endpoint: Endpoint, _context: Option<&Context>) -> bool {
        is_token_response(grant, endpoint)
    }
}

impl ResponseParameter for TokenType<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }

    fn is_required(&self, grant: Grant, endpoint: Endpoint, _context: Option<&Context>) -> bool {
        is_token_response(grant, endpoint)
    }
}

impl ResponseParameter for RefreshToken<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl ResponseParameter for Scope<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }

    /// Optional while identical to the scope the context recorded, required
    /// as soon as the granted scope deviates from it.
    fn is_required(&self, grant: Grant, endpoint: Endpoint, context: Option<&Context>) -> bool {
        if !is_token_response(grant, endpoint) {
            return false;
        }

        let Some(context) = context else {
            return false;
        };

        let granted = context.scope().cloned().unwrap_or_default();
        let response: crate::Scope = self.as_deref().unwrap_or_default().parse().unwrap();

        granted != response
    }
}

impl ResponseParameter for State<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }

    fn is_required(&self, grant: Grant, endpoint: Endpoint, context: Option<&Context>) -> bool {
        matches!(
            (grant, endpoint),
            (Grant::AuthorizationCode | Grant::Implicit, Endpoint::Authorization)
        ) && context
            .and_then(Context::state)
            .map_or(false, |state| !state.is_empty())
    }
}

impl ResponseParameter for Code<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }

    fn is_required(&self, grant: Grant, endpoint: Endpoint, _context: Option<&Context>) -> bool {
        grant == Grant::AuthorizationCode && endpoint == Endpoint::Authorization
    }
}

/// `expires_in`: access-token lifetime in seconds.
///
/// Numeric rather than string-valued; it is recommended on token responses
/// but never hard-required, so its contract is the default one.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpiresIn(Option<u64>);

impl ExpiresIn {
    pub const NAME: &'static str = "expires_in";

    #[must_use]
    pub fn new(seconds: u64) -> Self {
        Self(Some(seconds))
    }

    #[must_use]
    pub fn absent() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn as_secs(&self) -> Option<u64> {
        self.0
    }
}

impl ResponseParameter for ExpiresIn {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        None
    }
}
