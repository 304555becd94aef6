//! Property-based tests for query normalization.
