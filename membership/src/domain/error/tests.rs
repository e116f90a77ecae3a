//! Tests for domain error construction and serialisation.

use super::*;
use super::DomainError as Error;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn remote_error() -> Error {
    Error::remote("could not remove project member")
        .with_details(json!({ "cause": "status 500" }))
}

#[rstest]
#[case::invalid_request(Error::invalid_request("bad role"), ErrorCode::InvalidRequest)]
#[case::no_selection(Error::no_project_selected("pick one"), ErrorCode::NoProjectSelected)]
#[case::remote(Error::remote("offline"), ErrorCode::Remote)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_a_message_for_blank_input() {
    let error = Error::new(ErrorCode::NoProjectSelected, "");
    assert_eq!(error.message(), "no project is selected");
}

#[rstest]
fn display_uses_the_message(remote_error: Error) {
    assert_eq!(remote_error.to_string(), "could not remove project member");
}

#[rstest]
fn serialises_code_in_snake_case(remote_error: Error) {
    let value = serde_json::to_value(&remote_error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "remote",
            "message": "could not remove project member",
            "details": { "cause": "status 500" }
        })
    );
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let result = serde_json::from_value::<Error>(json!({
        "code": "no_project_selected",
        "message": "  "
    }));
    assert!(result.is_err(), "blank messages must not deserialise");
}

#[rstest]
fn deserialising_round_trips_details(remote_error: Error) {
    let value = serde_json::to_value(&remote_error).expect("serialise error");
    let decoded: Error = serde_json::from_value(value).expect("deserialise error");
    assert_eq!(decoded, remote_error);
}
