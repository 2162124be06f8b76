// system-tests/tests/helpers/require.rs
// ============================================================================
// Module: Assertion Helpers
// Description: Result-returning assertions for system-test scenarios.
// Purpose: Let scenarios fail with a message instead of panicking mid-flow.
// ============================================================================

use std::fmt::Debug;

use cluster_reports_client::ClientError;

/// Fails with `message` unless `left == right`.
pub fn require_eq<T: PartialEq + Debug>(left: &T, right: &T, message: &str) -> Result<(), String> {
    if left == right {
        Ok(())
    } else {
        Err(format!("{message}: left={left:?} right={right:?}"))
    }
}

/// Fails with `message` unless `condition` holds.
pub fn require(condition: bool, message: &str) -> Result<(), String> {
    if condition { Ok(()) } else { Err(message.to_string()) }
}

/// Requires an API error with the given status and code.
pub fn require_api_error<T: Debug>(
    result: Result<T, ClientError>,
    status: u16,
    code: &str,
) -> Result<(), String> {
    match result {
        Err(ClientError::Api {
            status: actual_status,
            code: actual_code,
            ..
        }) if actual_status == status && actual_code == code => Ok(()),
        other => Err(format!("expected {status} {code}, got {other:?}")),
    }
}
