//! Integration tests for the collector
//!
//! Fetch runs go against wiremock servers standing in for the station sites;
//! compile runs read data trees written into temporary directories.

mod common;
mod compile_tests;
mod get_tests;
