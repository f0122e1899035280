// Unit tests for error location capture

use crate::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::caller()` captures the calling frame.
///
/// **WHY THIS MATTERS**: Every error variant in the workspace embeds one of these.
/// If capture breaks, every log line points at the error constructor instead of
/// the site that actually failed.
///
/// **BUG THIS CATCHES**: Would catch if `#[track_caller]` is removed from
/// `ErrorLocation::caller()`, which silently shifts all reported locations into
/// the common crate.
#[test]
fn given_call_site_when_caller_invoked_then_captures_this_file() {
    // GIVEN/WHEN: Capturing from this test
    let location = ErrorLocation::caller();

    // THEN: Should point into this file
    assert!(
        location.file.contains("error_location.rs"),
        "Should capture file path, got {}",
        location.file
    );
    assert!(location.line > 0, "Should capture a line number");
    assert!(location.column > 0, "Should capture a column number");
}

/// **VALUE**: Verifies the Display format stays "[file:line:column]".
///
/// **WHY THIS MATTERS**: The bracketed suffix is part of every error message in
/// the workspace; log-scraping and humans both rely on it.
///
/// **BUG THIS CATCHES**: Would catch a Display refactor that drops the brackets
/// or one of the three components.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: A captured location
    let location = ErrorLocation::from(Location::caller());

    // WHEN: Formatting as string
    let formatted = format!("{}", location);

    // THEN: Should produce "[file:line:column]"
    assert!(formatted.starts_with('['), "Should start with '['");
    assert!(formatted.ends_with(']'), "Should end with ']'");
    assert!(
        formatted.contains(&location.line.to_string()),
        "Should include line number"
    );
    assert_eq!(
        formatted.matches(':').count(),
        2,
        "Should have exactly 2 colons"
    );
}

/// **VALUE**: Proves `#[track_caller]` propagates through helper frames.
///
/// **WHY THIS MATTERS**: Error constructors across the workspace rely on
/// propagation so that two different call sites report two different lines.
///
/// **BUG THIS CATCHES**: Would catch a refactor that inserts a non-annotated
/// frame between the call site and the capture, collapsing all locations onto
/// one line.
#[test]
fn given_two_call_sites_when_capturing_then_lines_differ() {
    // GIVEN: Two sequential call sites
    let first = ErrorLocation::caller();
    let second = ErrorLocation::caller();

    // THEN: Same file, sequential lines
    assert_eq!(first.file, second.file, "Should share a file");
    assert_eq!(first.line + 1, second.line, "Lines should be sequential");
}

/// **VALUE**: Verifies locations serialize (they ride inside the app's Tauri-facing errors).
///
/// **WHY THIS MATTERS**: The desktop crate derives `Serialize` on its error type;
/// a non-serializable field there is a compile error far away from this crate.
///
/// **BUG THIS CATCHES**: Would catch removal of the `Serialize` derive.
#[test]
fn given_error_location_when_serialized_then_contains_fields() {
    // GIVEN: A captured location
    let location = ErrorLocation::caller();

    // WHEN: Serializing to JSON
    let json = serde_json::to_string(&location).expect("location should serialize");

    // THEN: Should contain the field names
    assert!(json.contains("\"file\""), "JSON should contain file field");
    assert!(json.contains("\"line\""), "JSON should contain line field");
}
