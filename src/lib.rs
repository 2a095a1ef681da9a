//! Protocol core of an OAuth2 authorization server: request validation,
//! the four standard grant flows, and issuance of the opaque credentials
//! (authorization codes, access tokens, refresh tokens) that tie them
//! together. Transport bindings, persistence, and token encodings live
//! behind the seams exposed here.

#[macro_use]
extern crate tracing;

use strum::{AsRefStr, Display, EnumString};

pub use self::error::{Error, ErrorCode, ErrorResponse, Result};
pub use self::scope::Scope;

pub mod client;
pub mod code;
pub mod context;
pub mod error;
pub mod flow;
pub mod params;
pub mod scope;
pub mod secret;
pub mod token;

/// The four grant flows this core understands.
///
/// The wire name doubles as the `grant_type` parameter value; the implicit
/// grant never appears on the token endpoint, so its name is only ever
/// used for dispatch.
#[derive(AsRefStr, Clone, Copy, Debug, Display, EnumString, Eq, Hash, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum Grant {
    AuthorizationCode,
    Implicit,
    Password,
    ClientCredentials,
}

/// The two logical entry points a request/response pair is validated against.
#[derive(AsRefStr, Clone, Copy, Debug, Display, Eq, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum Endpoint {
    Authorization,
    Token,
}

/// Values of the `response_type` authorization-endpoint parameter.
#[derive(AsRefStr, Clone, Copy, Debug, Display, EnumString, Eq, Hash, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum ResponseType {
    Code,
    Token,
}
