use crate::{Grant, ResponseType};
use serde::Serialize;
use std::borrow::Cow;
use strum::AsRefStr;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can terminate a grant flow.
///
/// Each kind is distinct on purpose: an unknown client, a missing context and
/// a consumed code are different failures and are never collapsed into one
/// another. Nothing here is recoverable by substituting a default; callers
/// either fix the request or give up.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid request parameter \"{name}\": {value:?}")]
    InvalidRequestParameter {
        name: &'static str,
        value: Option<String>,
    },

    #[error("invalid response parameter \"{name}\": {value:?}")]
    InvalidResponseParameter {
        name: &'static str,
        value: Option<String>,
    },

    #[error("client \"{client_id}\" is not registered")]
    ClientNotRegistered { client_id: String },

    #[error("client \"{client_id}\" failed to authenticate")]
    ClientAuthenticationFailed { client_id: String },

    #[error("client property \"{name}\" is already registered: {value}")]
    DuplicateClientProperty {
        name: &'static str,
        value: String,
    },

    #[error("client property \"{name}\" is malformed: {value}")]
    InvalidClientProperty {
        name: &'static str,
        value: String,
    },

    #[error("no authorization context is set up for this request")]
    ContextNotSetUp,

    #[error("authorization code is unknown or was already consumed")]
    AuthorizationFailed,

    #[error("authorization code expired")]
    AuthorizationCodeExpired,

    #[error("requested scope exceeds what the client registered: {scope}")]
    ScopeNotAllowed { scope: String },

    #[error("client \"{client_id}\" may not use the \"{grant}\" grant")]
    GrantTypeNotAllowed { client_id: String, grant: Grant },

    #[error("client \"{client_id}\" may not request the \"{response_type}\" response type")]
    ResponseTypeNotAllowed {
        client_id: String,
        response_type: ResponseType,
    },

    #[error("unsupported grant type: {value}")]
    UnsupportedGrantType { value: String },
}

/// Wire-level error codes of the `error` response parameter.
#[derive(AsRefStr, Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    InvalidClient,
    InvalidGrant,
    UnauthorizedClient,
    UnsupportedGrantType,
    InvalidScope,
}

impl From<&Error> for ErrorCode {
    fn from(value: &Error) -> Self {
        debug!(error = ?value);

        match value {
            Error::InvalidRequestParameter { .. }
            | Error::InvalidResponseParameter { .. }
            | Error::DuplicateClientProperty { .. }
            | Error::InvalidClientProperty { .. } => Self::InvalidRequest,
            Error::ClientNotRegistered { .. } | Error::ClientAuthenticationFailed { .. } => {
                Self::InvalidClient
            }
            Error::ContextNotSetUp
            | Error::AuthorizationFailed
            | Error::AuthorizationCodeExpired => Self::InvalidGrant,
            Error::ScopeNotAllowed { .. } => Self::InvalidScope,
            Error::GrantTypeNotAllowed { .. } | Error::ResponseTypeNotAllowed { .. } => {
                Self::UnauthorizedClient
            }
            Error::UnsupportedGrantType { .. } => Self::UnsupportedGrantType,
        }
    }
}

/// Serializable error body handed back to the transport layer.
#[derive(Serialize)]
pub struct ErrorResponse<'a> {
    pub error: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<Cow<'a, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<Cow<'a, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Cow<'a, str>>,
}

impl<'a> ErrorResponse<'a> {
    #[must_use]
    pub fn new(error: &Error) -> Self {
        Self {
            error: error.into(),
            error_description: Some(error.to_string().into()),
            error_uri: None,
            state: None,
        }
    }

    /// Echo the `state` of the request this error answers.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<Cow<'a, str>>) -> Self {
        self.state = Some(state.into());
        self
    }
}
