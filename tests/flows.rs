use sekisho::{
    flow::{self, client_credentials, implicit, password, TokenType},
    params::request::ClientCredential,
    Error, Scope,
};

mod fixtures;

use self::fixtures::{confidential_metadata, public_metadata, redirect_uri, Fixture};

#[test]
fn implicit_issues_a_token_straight_from_the_authorization_endpoint() {
    let fixture = Fixture::generate();
    let client = fixture.register(public_metadata("app"));
    let uri = redirect_uri("app");

    let request = implicit::AuthorizationRequest::builder()
        .response_type("token")
        .client_id(&*client.client_id)
        .redirect_uri(&*uri)
        .scope("read")
        .state("cat tax")
        .build();

    let response = implicit::handle(&fixture.flows(), request).unwrap();

    assert!(!response.access_token.is_empty());
    assert_eq!(response.token_type, TokenType::Bearer);
    assert_eq!(response.expires_in, 3600);
    assert_eq!(response.state.as_deref(), Some("cat tax"));
    assert!(response.scope.is_none());
}

#[test]
fn implicit_rejects_unknown_clients() {
    let fixture = Fixture::generate();

    let request = implicit::AuthorizationRequest::builder()
        .response_type("token")
        .client_id("nobody")
        .build();

    let error = implicit::handle(&fixture.flows(), request).unwrap_err();
    assert!(matches!(error, Error::ClientNotRegistered { .. }));
}

#[test]
fn implicit_rejects_the_code_response_type() {
    let fixture = Fixture::generate();
    let client = fixture.register(public_metadata("app"));

    let request = implicit::AuthorizationRequest::builder()
        .response_type("code")
        .client_id(&*client.client_id)
        .build();

    let error = implicit::handle(&fixture.flows(), request).unwrap_err();
    assert!(matches!(
        error,
        Error::InvalidRequestParameter { name: "response_type", .. }
    ));
}

#[test]
fn implicit_respects_the_registered_grants() {
    let fixture = Fixture::generate();

    // Registered for the code grant only.
    let client = fixture.register(confidential_metadata("app"));

    let request = implicit::AuthorizationRequest::builder()
        .response_type("token")
        .client_id(&*client.client_id)
        .build();

    let error = implicit::handle(&fixture.flows(), request).unwrap_err();
    assert!(matches!(error, Error::GrantTypeNotAllowed { .. }));
}

#[test]
fn implicit_respects_the_registered_response_types() {
    let fixture = Fixture::generate();

    // The grant is allowed but the client never registered the `token`
    // response type.
    let metadata = sekisho::client::ClientMetadata::builder()
        .redirect_uris(std::collections::HashSet::from([redirect_uri("app")]))
        .client_uri("https://app.example")
        .grant_types(std::collections::HashSet::from([sekisho::Grant::Implicit]))
        .response_types(std::collections::HashSet::from([sekisho::ResponseType::Code]))
        .build();
    let client = fixture.register(metadata);

    let request = implicit::AuthorizationRequest::builder()
        .response_type("token")
        .client_id(&*client.client_id)
        .build();

    let error = implicit::handle(&fixture.flows(), request).unwrap_err();
    assert!(matches!(error, Error::ResponseTypeNotAllowed { .. }));
}

#[test]
fn password_issues_both_tokens() {
    let fixture = Fixture::generate();

    let request = password::TokenRequest::builder()
        .grant_type("password")
        .username("user")
        .password("hunter2")
        .scope("read")
        .build();

    let response = password::handle(&fixture.flows(), request).unwrap();

    assert!(!response.access_token.is_empty());
    assert!(!response.refresh_token.is_empty());
    assert_eq!(response.token_type, TokenType::Bearer);
    assert_eq!(response.scope, Some("read".parse::<Scope>().unwrap()));
}

#[test]
fn password_rejects_a_foreign_grant_type_value() {
    let fixture = Fixture::generate();

    let request = password::TokenRequest::builder()
        .grant_type("client_credentials")
        .username("user")
        .password("hunter2")
        .build();

    let error = password::handle(&fixture.flows(), request).unwrap_err();
    assert!(matches!(error, Error::UnsupportedGrantType { .. }));
}

#[test]
fn client_credentials_issues_tokens_to_the_client_itself() {
    let fixture = Fixture::generate();
    let client = fixture.register(confidential_metadata("app"));
    let secret = client.client_secret.clone().unwrap();

    let request = client_credentials::TokenRequest::builder()
        .grant_type("client_credentials")
        .client_id(&*client.client_id)
        .client_credential(ClientCredential::new(&*client.client_id, &*secret))
        .build();

    let response = client_credentials::handle(&fixture.flows(), request).unwrap();

    assert!(!response.access_token.is_empty());
    assert!(!response.refresh_token.is_empty());
    assert_eq!(response.token_type, TokenType::Bearer);
}

#[test]
fn client_credentials_rejects_a_wrong_secret() {
    let fixture = Fixture::generate();
    let client = fixture.register(confidential_metadata("app"));

    let request = client_credentials::TokenRequest::builder()
        .grant_type("client_credentials")
        .client_id(&*client.client_id)
        .client_credential(ClientCredential::new(&*client.client_id, "wrong"))
        .build();

    let error = client_credentials::handle(&fixture.flows(), request).unwrap_err();
    assert!(matches!(error, Error::ClientAuthenticationFailed { .. }));
}

#[test]
fn client_credentials_rejects_unknown_clients() {
    let fixture = Fixture::generate();

    let request = client_credentials::TokenRequest::builder()
        .grant_type("client_credentials")
        .client_id("nobody")
        .build();

    let error = client_credentials::handle(&fixture.flows(), request).unwrap_err();
    assert!(matches!(error, Error::ClientNotRegistered { .. }));
}

#[test]
fn client_credentials_respects_the_registered_grants() {
    let fixture = Fixture::generate();

    let metadata = sekisho::client::ClientMetadata::builder()
        .redirect_uris(std::collections::HashSet::from([redirect_uri("app")]))
        .client_uri("https://app.example")
        .build();
    let client = fixture.register(metadata);

    let request = client_credentials::TokenRequest::builder()
        .grant_type("client_credentials")
        .client_id(&*client.client_id)
        .build();

    let error = client_credentials::handle(&fixture.flows(), request).unwrap_err();
    assert!(matches!(error, Error::GrantTypeNotAllowed { .. }));
}

#[test]
fn dispatch_routes_by_variant() {
    let fixture = Fixture::generate();
    let flows = fixture.flows();
    fixture.register(public_metadata("app"));

    let request = flow::Request::Password(
        password::TokenRequest::builder()
            .grant_type("password")
            .username("user")
            .password("hunter2")
            .build(),
    );

    match flow::dispatch(&flows, request).unwrap() {
        flow::Response::Password(response) => {
            assert_eq!(response.token_type, TokenType::Bearer);
        }
        _ => panic!("dispatched to the wrong flow"),
    }
}

#[test]
fn token_responses_serialize_to_the_wire_shape() {
    let fixture = Fixture::generate();

    let request = password::TokenRequest::builder()
        .grant_type("password")
        .username("user")
        .password("hunter2")
        .build();

    let response = password::handle(&fixture.flows(), request).unwrap();
    let rendered = sonic_rs::to_string(&response).unwrap();

    assert!(rendered.contains("\"access_token\""));
    assert!(rendered.contains("\"token_type\":\"Bearer\""));
    assert!(rendered.contains("\"refresh_token\""));
    assert!(rendered.contains("\"expires_in\":3600"));
    // No scope was requested, so none is serialized.
    assert!(!rendered.contains("\"scope\""));
}

#[test]
fn error_responses_serialize_to_the_wire_shape() {
    let error = Error::ContextNotSetUp;
    let rendered = sonic_rs::to_string(&sekisho::ErrorResponse::new(&error)).unwrap();

    assert!(rendered.contains("\"error\":\"invalid_grant\""));
    assert!(rendered.contains("\"error_description\""));
    assert!(!rendered.contains("\"state\""));

    let rendered =
        sonic_rs::to_string(&sekisho::ErrorResponse::new(&error).with_state("cat tax")).unwrap();
    assert!(rendered.contains("\"state\":\"cat tax\""));
}
