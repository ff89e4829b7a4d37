//! scout benchmarking suite
//!
//! Benchmarks for the hot paths of a search: decoding `npm search` output,
//! normalizing registry responses and parsing configuration.

pub mod common;

pub use common::*;
