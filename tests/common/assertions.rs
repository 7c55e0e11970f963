//! Custom assertion macros
//!
//! Shorthands for the gateway and drain outcomes the suites check over and over.

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a gateway call was queued and return the operation id
#[macro_export]
macro_rules! assert_queued {
    ($result:expr) => {
        match $result {
            Ok(liftlog::client::Outcome::Queued { operation_id }) => operation_id,
            other => panic!("Expected Queued, got: {:?}", other),
        }
    };
}

/// Assert that a drain ran to completion and return its report
#[macro_export]
macro_rules! assert_drained {
    ($outcome:expr) => {
        match $outcome {
            liftlog::client::DrainOutcome::Completed(report) => report,
            other => panic!("Expected a completed drain, got: {:?}", other),
        }
    };
}
