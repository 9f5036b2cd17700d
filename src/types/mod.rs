pub mod base;
pub(crate) mod input;
pub(crate) mod scalars;
