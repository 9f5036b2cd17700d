//! Library tests and fixtures

pub mod fixtures;
mod util;

mod resolver_tests;
