use super::{wire_param, RequestParameter, RequestView};
use crate::{Endpoint, Grant};
use std::{borrow::Cow, fmt};
use url::Url;

wire_param! {
    /// `response_type`: which authorization-endpoint response the client asks for.
    ResponseType => "response_type";
    /// `client_id`: the server-issued client identifier.
    ClientId => "client_id";
    /// `redirect_uri`: where the authorization endpoint sends the user agent back to.
    RedirectUri => "redirect_uri";
    /// `scope`: requested scope items, space-delimited.
    Scope => "scope";
    /// `state`: opaque client value, echoed verbatim on responses.
    State => "state";
    /// `grant_type`: which grant a token request exercises.
    GrantType => "grant_type";
    /// `code`: the authorization code being redeemed.
    Code => "code";
    /// `username`: resource-owner name for the password grant.
    Username => "username";
}

impl RequestParameter for ResponseType<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }

    fn is_required(&self, grant: Grant, endpoint: Endpoint) -> bool {
        matches!(
            (grant, endpoint),
            (Grant::AuthorizationCode | Grant::Implicit, Endpoint::Authorization)
        )
    }
}

impl RequestParameter for ClientId<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }

    fn is_required(&self, grant: Grant, endpoint: Endpoint) -> bool {
        match grant {
            Grant::AuthorizationCode | Grant::ClientCredentials => true,
            Grant::Implicit | Grant::Password => endpoint == Endpoint::Authorization,
        }
    }

    fn validate(&self, view: &RequestView<'_>, grant: Grant, endpoint: Endpoint) -> bool {
        if self.is_required(grant, endpoint) && self.value().map_or(true, str::is_empty) {
            return false;
        }

        // When the request also carries a client credential, the bare
        // `client_id` must agree with the id embedded in it.
        match view
            .client_credential
            .and_then(ClientCredential::client_id)
        {
            Some(embedded) => self.as_deref() == Some(embedded),
            None => true,
        }
    }
}

impl RequestParameter for RedirectUri<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }

    fn is_required(&self, grant: Grant, endpoint: Endpoint) -> bool {
        grant == Grant::AuthorizationCode && endpoint == Endpoint::Token
    }

    fn validate(&self, _view: &RequestView<'_>, grant: Grant, endpoint: Endpoint) -> bool {
        if self.is_required(grant, endpoint) && self.value().map_or(true, str::is_empty) {
            return false;
        }

        // Relative or otherwise malformed URIs are rejected up front; whether
        // the URI is registered for the client is decided later.
        self.as_deref().map_or(true, |uri| Url::parse(uri).is_ok())
    }
}

impl RequestParameter for Scope<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl RequestParameter for State<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl RequestParameter for GrantType<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }

    fn is_required(&self, grant: Grant, endpoint: Endpoint) -> bool {
        endpoint == Endpoint::Token && grant != Grant::Implicit
    }
}

impl RequestParameter for Code<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }

    fn is_required(&self, grant: Grant, endpoint: Endpoint) -> bool {
        grant == Grant::AuthorizationCode && endpoint == Endpoint::Token
    }
}

impl RequestParameter for Username<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }

    fn is_required(&self, grant: Grant, endpoint: Endpoint) -> bool {
        grant == Grant::Password && endpoint == Endpoint::Token
    }
}

/// `password`: resource-owner password for the password grant.
///
/// Not generated through the usual boilerplate so its `Debug` output can
/// stay redacted.
#[derive(Clone, Default)]
pub struct Password<'a>(Option<Cow<'a, str>>);

impl<'a> Password<'a> {
    pub const NAME: &'static str = "password";

    #[must_use]
    pub fn new(value: impl Into<Cow<'a, str>>) -> Self {
        Self(Some(value.into()))
    }

    #[must_use]
    pub fn absent() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<'a> From<&'a str> for Password<'a> {
    fn from(value: &'a str) -> Self {
        Self::new(value)
    }
}

impl<'a> From<String> for Password<'a> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Password<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(std::any::type_name::<Self>())
            .field(&"[redacted]")
            .finish()
    }
}

impl RequestParameter for Password<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn value(&self) -> Option<&str> {
        self.as_deref()
    }

    fn is_required(&self, grant: Grant, endpoint: Endpoint) -> bool {
        grant == Grant::Password && endpoint == Endpoint::Token
    }
}

/// Client credentials presented alongside a request, as extracted by the
/// transport from the `Authorization` header or the form body.
#[derive(Clone, Default)]
pub struct ClientCredential<'a> {
    client_id: Option<Cow<'a, str>>,
    client_secret: Option<Cow<'a, str>>,
}

impl<'a> ClientCredential<'a> {
    pub const NAME: &'static str = "Authorization";

    #[must_use]
    pub fn new(
        client_id: impl Into<Cow<'a, str>>,
        client_secret: impl Into<Cow<'a, str>>,
    ) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
        }
    }

    /// Credential of a public client, which has no secret to present.
    #[must_use]
    pub fn with_client_id(client_id: impl Into<Cow<'a, str>>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: None,
        }
    }

    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }
}

impl fmt::Debug for ClientCredential<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

impl RequestParameter for ClientCredential<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    /// The credential is reported through its embedded client id; the secret
    /// never surfaces in validation errors.
    fn value(&self) -> Option<&str> {
        self.client_id()
    }

    fn is_required(&self, grant: Grant, endpoint: Endpoint) -> bool {
        grant == Grant::AuthorizationCode && endpoint == Endpoint::Token
    }
}
