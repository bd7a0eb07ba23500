//! AtomicFile integration tests
