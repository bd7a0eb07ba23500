//! WAL integration tests

mod record_tests;
