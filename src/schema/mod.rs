//! Schema model, builder and serializer.

pub mod builder;
pub mod error;
pub mod meta;
pub mod model;
mod printer;
pub(crate) mod registry;
