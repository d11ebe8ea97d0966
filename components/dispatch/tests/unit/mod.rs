//! Unit tests for dispatch
