use rstest::rstest;
use sekisho::Scope;

#[rstest]
#[case("profile", "profile email")]
#[case("profile email", "profile email")]
#[case("openid profile email", "openid profile email offline_access")]
fn can_perform(#[case] request: &str, #[case] client: &str) {
    let request: Scope = request.parse().unwrap();
    let client: Scope = client.parse().unwrap();

    assert!(client.can_perform(&request));
}

#[rstest]
#[case("profile email", "profile")]
#[case("profile offline_access", "email")]
#[case("email openid", "profile")]
fn cant_perform(#[case] request: &str, #[case] client: &str) {
    let request: Scope = request.parse().unwrap();
    let client: Scope = client.parse().unwrap();

    assert!(!client.can_perform(&request));
}

#[rstest]
#[case("profile", "profile email")]
#[case("profile", "profile")]
#[case("offline_access", "profile offline_access")]
#[case("email offline_access", "offline_access email")]
fn can_access(#[case] endpoint: &str, #[case] client: &str) {
    let endpoint: Scope = endpoint.parse().unwrap();
    let client: Scope = client.parse().unwrap();

    assert!(endpoint.can_be_accessed_by(&client));
}

#[rstest]
#[case("profile email", "email")]
#[case("offline_access", "profile email")]
#[case("email offline_access", "profile offline_access")]
fn cant_access(#[case] endpoint: &str, #[case] client: &str) {
    let endpoint: Scope = endpoint.parse().unwrap();
    let client: Scope = client.parse().unwrap();

    assert!(!endpoint.can_be_accessed_by(&client));
}

#[test]
fn display_preserves_order() {
    let scope: Scope = "write read follow".parse().unwrap();
    assert_eq!(scope.to_string(), "write read follow");
}

#[test]
fn equality_ignores_order() {
    let left: Scope = "read write".parse().unwrap();
    let right: Scope = "write read".parse().unwrap();

    assert_eq!(left, right);
}

#[test]
fn parse_deduplicates() {
    let scope: Scope = "read read write read".parse().unwrap();

    assert_eq!(scope.len(), 2);
    assert_eq!(scope.to_string(), "read write");
}

#[test]
fn empty_parses_empty() {
    let scope: Scope = "".parse().unwrap();

    assert!(scope.is_empty());
    assert_eq!(scope, Scope::new());
}
