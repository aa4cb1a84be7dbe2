//! Shared utilities for integration tests

#![allow(dead_code)]

mod catalog;

pub use catalog::*;
