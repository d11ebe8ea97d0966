//! Unit tests for the matching engine

mod engine_test;
mod memoization_test;
