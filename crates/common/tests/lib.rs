// crates/common/tests/lib.rs
use gatekeeper_common::{SignInRequest, SignUpRequest, SignUpResponse, Subject};
use serde_json::json;

#[test]
fn test_subject_round_trip() {
    let subject = Subject {
        id: 42,
        email: "a@x.com".to_string(),
        phone: String::new(),
        roles: vec!["user".to_string(), "admin".to_string()],
    };

    let bytes = serde_json::to_vec(&subject).unwrap();
    let deserialized: Subject = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(deserialized, subject);
}

#[test]
fn test_request_identifiers_default_to_empty() {
    let req: SignUpRequest = serde_json::from_value(json!({
        "email": "a@x.com",
        "password": "Abc123!"
    }))
    .unwrap();

    assert_eq!(req.email, "a@x.com");
    assert!(req.phone.is_empty());

    let req: SignInRequest = serde_json::from_value(json!({
        "phone": "79990001122",
        "password": "Abc123!"
    }))
    .unwrap();

    assert!(req.email.is_empty());
    assert_eq!(req.phone, "79990001122");
}

#[test]
fn test_signup_response_omits_empty_identifier() {
    let resp = SignUpResponse {
        id: 1,
        email: "a@x.com".to_string(),
        phone: String::new(),
    };

    let value = serde_json::to_value(&resp).unwrap();
    assert_eq!(value, json!({ "id": 1, "email": "a@x.com" }));
}
