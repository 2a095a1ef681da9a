use sekisho::{
    flow::{authorization_code, client_credentials, implicit, password},
    params::request::{ClientCredential, Code, GrantType, Password, RedirectUri, ResponseType, Username},
    Error, Result,
};

fn assert_param_rejected<T>(result: Result<T>, expected: &str) {
    match result {
        Err(Error::InvalidRequestParameter { name, .. }) => assert_eq!(name, expected),
        Err(other) => panic!("expected invalid parameter \"{expected}\", got {other}"),
        Ok(..) => panic!("expected invalid parameter \"{expected}\""),
    }
}

#[test]
fn authorization_request_requires_response_type() {
    let request = authorization_code::AuthorizationRequest::builder()
        .response_type(ResponseType::absent())
        .client_id("client")
        .build();

    assert_param_rejected(request.validate(), "response_type");
}

#[test]
fn authorization_request_requires_client_id() {
    let request = authorization_code::AuthorizationRequest::builder()
        .response_type("code")
        .client_id(sekisho::params::request::ClientId::absent())
        .build();

    assert_param_rejected(request.validate(), "client_id");
}

#[test]
fn empty_value_counts_as_missing() {
    let request = authorization_code::AuthorizationRequest::builder()
        .response_type("")
        .client_id("client")
        .build();

    assert_param_rejected(request.validate(), "response_type");
}

#[test]
fn optional_parameters_may_stay_absent() {
    let request = authorization_code::AuthorizationRequest::builder()
        .response_type("code")
        .client_id("client")
        .build();

    request.validate().unwrap();
}

#[test]
fn token_request_requires_grant_type() {
    let request = authorization_code::TokenRequest::builder()
        .grant_type(GrantType::absent())
        .code("code value")
        .redirect_uri("https://app.example/cb")
        .client_id("client")
        .client_credential(ClientCredential::new("client", "secret"))
        .build();

    assert_param_rejected(request.validate(), "grant_type");
}

#[test]
fn token_request_requires_code() {
    let request = authorization_code::TokenRequest::builder()
        .grant_type("authorization_code")
        .code(Code::absent())
        .redirect_uri("https://app.example/cb")
        .client_id("client")
        .client_credential(ClientCredential::new("client", "secret"))
        .build();

    assert_param_rejected(request.validate(), "code");
}

#[test]
fn token_request_requires_redirect_uri() {
    let request = authorization_code::TokenRequest::builder()
        .grant_type("authorization_code")
        .code("code value")
        .redirect_uri(RedirectUri::absent())
        .client_id("client")
        .client_credential(ClientCredential::new("client", "secret"))
        .build();

    assert_param_rejected(request.validate(), "redirect_uri");
}

#[test]
fn token_request_requires_client_credential() {
    let request = authorization_code::TokenRequest::builder()
        .grant_type("authorization_code")
        .code("code value")
        .redirect_uri("https://app.example/cb")
        .client_id("client")
        .build();

    assert_param_rejected(request.validate(), "Authorization");
}

#[test]
fn token_request_rejects_relative_redirect_uri() {
    let request = authorization_code::TokenRequest::builder()
        .grant_type("authorization_code")
        .code("code value")
        .redirect_uri("/cb")
        .client_id("client")
        .client_credential(ClientCredential::new("client", "secret"))
        .build();

    assert_param_rejected(request.validate(), "redirect_uri");
}

#[test]
fn client_id_must_agree_with_credential() {
    let request = authorization_code::TokenRequest::builder()
        .grant_type("authorization_code")
        .code("code value")
        .redirect_uri("https://app.example/cb")
        .client_id("client")
        .client_credential(ClientCredential::new("somebody else", "secret"))
        .build();

    assert_param_rejected(request.validate(), "client_id");
}

#[test]
fn implicit_request_requires_response_type() {
    let request = implicit::AuthorizationRequest::builder()
        .response_type(ResponseType::absent())
        .client_id("client")
        .build();

    assert_param_rejected(request.validate(), "response_type");
}

#[test]
fn implicit_request_requires_client_id() {
    let request = implicit::AuthorizationRequest::builder()
        .response_type("token")
        .client_id(sekisho::params::request::ClientId::absent())
        .build();

    assert_param_rejected(request.validate(), "client_id");
}

#[test]
fn password_request_requires_username() {
    let request = password::TokenRequest::builder()
        .grant_type("password")
        .username(Username::absent())
        .password("hunter2")
        .build();

    assert_param_rejected(request.validate(), "username");
}

#[test]
fn password_request_requires_password() {
    let request = password::TokenRequest::builder()
        .grant_type("password")
        .username("user")
        .password(Password::absent())
        .build();

    assert_param_rejected(request.validate(), "password");
}

#[test]
fn password_request_requires_grant_type() {
    let request = password::TokenRequest::builder()
        .grant_type(GrantType::absent())
        .username("user")
        .password("hunter2")
        .build();

    assert_param_rejected(request.validate(), "grant_type");
}

#[test]
fn client_credentials_request_requires_grant_type() {
    let request = client_credentials::TokenRequest::builder()
        .grant_type(GrantType::absent())
        .client_id("client")
        .build();

    assert_param_rejected(request.validate(), "grant_type");
}

#[test]
fn client_credentials_request_requires_client_id() {
    let request = client_credentials::TokenRequest::builder()
        .grant_type("client_credentials")
        .client_id(sekisho::params::request::ClientId::absent())
        .build();

    assert_param_rejected(request.validate(), "client_id");
}

#[test]
fn failing_parameter_reports_its_value() {
    let request = authorization_code::TokenRequest::builder()
        .grant_type("authorization_code")
        .code("code value")
        .redirect_uri("not an absolute uri")
        .client_id("client")
        .client_credential(ClientCredential::new("client", "secret"))
        .build();

    match request.validate() {
        Err(Error::InvalidRequestParameter { name, value }) => {
            assert_eq!(name, "redirect_uri");
            assert_eq!(value.as_deref(), Some("not an absolute uri"));
        }
        other => panic!("expected invalid redirect_uri, got {other:?}"),
    }
}
