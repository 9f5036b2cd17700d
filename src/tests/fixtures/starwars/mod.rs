pub mod model;
pub mod schema;

pub use self::{
    model::{Database, Episode},
    schema::{builder, schema},
};
