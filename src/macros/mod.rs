//! Declarative macros and helper definitions for them.

#[macro_use]
mod literal;
