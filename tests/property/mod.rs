//! Property-based tests

mod queue_proptest;
mod workout_proptest;
