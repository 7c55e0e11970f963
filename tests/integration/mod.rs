//! Integration tests
//!
//! End-to-end flows of the offline-first client against a mock API.

mod offline_sync_test;
mod sync_service_test;
mod workout_test;
