//! Unit tests for optimistic mutations.
