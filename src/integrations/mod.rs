//! Provided implementations of third-party traits.

pub mod serde;
