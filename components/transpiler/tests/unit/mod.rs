//! Unit tests for the transpiler

mod batch_test;
mod transform_test;
