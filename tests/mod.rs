//! Test suite for LiftLog
//!
//! This module organizes all tests

pub mod integration;
pub mod property;
