use crate::{
    context::Context,
    error::{Error, Result},
    Endpoint, Grant,
};

pub mod request;
pub mod response;

/// Window over the full parameter set of the enclosing request, handed to
/// each parameter's validity predicate for cross-parameter rules.
#[derive(Clone, Copy, Default)]
pub struct RequestView<'a> {
    pub client_credential: Option<&'a request::ClientCredential<'a>>,
}

/// Rule contract of a single request-side protocol parameter.
///
/// Whether a parameter is required depends only on the (grant, endpoint)
/// pair; whether its value is valid may additionally depend on the rest of
/// the request. The defaults mean "optional and unconstrained", so a
/// parameter only overrides what actually concerns it.
pub trait RequestParameter {
    fn name(&self) -> &'static str;

    fn value(&self) -> Option<&str>;

    fn is_required(&self, grant: Grant, endpoint: Endpoint) -> bool {
        let _ = (grant, endpoint);
        false
    }

    fn validate(&self, view: &RequestView<'_>, grant: Grant, endpoint: Endpoint) -> bool {
        let _ = view;
        !(self.is_required(grant, endpoint) && self.value().map_or(true, str::is_empty))
    }

    /// Access the value of a parameter that already passed validation.
    fn require(&self) -> Result<&str> {
        self.value()
            .filter(|value| !value.is_empty())
            .ok_or(Error::InvalidRequestParameter {
                name: self.name(),
                value: None,
            })
    }
}

/// Rule contract of a single response-side protocol parameter.
///
/// Mirror of [`RequestParameter`], except that requiredness may also depend
/// on the correlated [`Context`] (e.g. `scope` is only required when it
/// differs from what the context recorded).
pub trait ResponseParameter {
    fn name(&self) -> &'static str;

    fn value(&self) -> Option<&str>;

    fn is_required(&self, grant: Grant, endpoint: Endpoint, context: Option<&Context>) -> bool {
        let _ = (grant, endpoint, context);
        false
    }

    fn validate(&self, grant: Grant, endpoint: Endpoint, context: Option<&Context>) -> bool {
        !(self.is_required(grant, endpoint, context) && self.value().map_or(true, str::is_empty))
    }
}

/// Run every declared parameter through its validity predicate.
///
/// The first failing parameter determines the reported error.
pub fn validate_request(
    params: &[&dyn RequestParameter],
    view: &RequestView<'_>,
    grant: Grant,
    endpoint: Endpoint,
) -> Result<()> {
    for param in params {
        if !param.validate(view, grant, endpoint) {
            debug!(
                name = param.name(),
                %grant,
                %endpoint,
                "request parameter failed validation"
            );

            return Err(Error::InvalidRequestParameter {
                name: param.name(),
                value: param.value().map(ToOwned::to_owned),
            });
        }
    }

    Ok(())
}

pub fn validate_response(
    params: &[&dyn ResponseParameter],
    grant: Grant,
    endpoint: Endpoint,
    context: Option<&Context>,
) -> Result<()> {
    for param in params {
        if !param.validate(grant, endpoint, context) {
            debug!(
                name = param.name(),
                %grant,
                %endpoint,
                "response parameter failed validation"
            );

            return Err(Error::InvalidResponseParameter {
                name: param.name(),
                value: param.value().map(ToOwned::to_owned),
            });
        }
    }

    Ok(())
}

/// Boilerplate of a string-valued wire parameter: a newtype over an optional
/// value plus the conversions the request builders lean on.
macro_rules! wire_param {
    ($($(#[$meta:meta])* $ident:ident => $name:literal;)+) => {$(
        $(#[$meta])*
        #[derive(Clone, Debug, Default)]
        pub struct $ident<'a>(Option<::std::borrow::Cow<'a, str>>);

        impl<'a> $ident<'a> {
            pub const NAME: &'static str = $name;

            #[must_use]
            pub fn new(value: impl Into<::std::borrow::Cow<'a, str>>) -> Self {
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

            #[must_use]
            pub fn into_inner(self) -> Option<::std::borrow::Cow<'a, str>> {
                self.0
            }
        }

        impl<'a> From<&'a str> for $ident<'a> {
            fn from(value: &'a str) -> Self {
                Self::new(value)
            }
        }

        impl<'a> From<String> for $ident<'a> {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl<'a> From<Option<&'a str>> for $ident<'a> {
            fn from(value: Option<&'a str>) -> Self {
                Self(value.map(::std::borrow::Cow::Borrowed))
            }
        }
    )+};
}

pub(crate) use wire_param;
