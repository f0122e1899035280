// Unit tests for error module
// Errors only ever surface as log lines, so Display carries the weight

use crate::error::DemoError;

use common::ErrorLocation;

/// **VALUE**: Tests that errors serialize (required for the Tauri boundary).
///
/// **WHY THIS MATTERS**: The error type derives Serialize so it stays usable in
/// Tauri contexts. If serialization breaks, the crate stops compiling against
/// any command that returns it.
///
/// **BUG THIS CATCHES**: Would catch removal of the `Serialize` derive or a new
/// non-serializable field on a variant.
#[test]
fn given_demo_error_when_serialized_then_contains_variant_and_message() {
    // GIVEN: A Core error
    let err = DemoError::Core {
        message: String::from("spawn failed"),
        location: ErrorLocation::caller(),
    };

    // WHEN: Serializing to JSON
    let json = serde_json::to_string(&err).expect("error should serialize");

    // THEN: Variant and message survive
    assert!(json.contains("Core"), "JSON should contain variant name");
    assert!(json.contains("spawn failed"), "JSON should contain message");
}

/// **VALUE**: Tests that the Display output ends with the capture location.
///
/// **WHY THIS MATTERS**: Every failure is diagnosed from console logs alone; the
/// `[file:line:col]` suffix is what makes a logged error traceable.
///
/// **BUG THIS CATCHES**: Would catch the `{location}` being dropped from an
/// `#[error(...)]` attribute during a refactor.
#[test]
fn given_window_error_when_displayed_then_includes_location_suffix() {
    // GIVEN: A Window error captured here
    let err = DemoError::Window {
        message: String::from("no webview"),
        location: ErrorLocation::caller(),
    };

    // WHEN: Formatting it
    let rendered = err.to_string();

    // THEN: Kind, message, and location are all present
    assert!(rendered.starts_with("Window Error:"), "Got: {rendered}");
    assert!(rendered.contains("no webview"), "Got: {rendered}");
    assert!(rendered.contains("tests/error.rs"), "Got: {rendered}");
    assert!(rendered.ends_with(']'), "Got: {rendered}");
}
