//! Schema inference from JSON documents
//!
//! - **classify**: kind of a single JSON value
//! - **reduce**: fold many object shapes into one representative
//! - **builder**: recursive walk producing entities

pub mod builder;
pub mod classify;
pub mod reduce;

pub use builder::{build, SchemaBuilder};
pub use classify::{classify, scalar_kind};
pub use reduce::{first_element_shape, reduce_array_of_objects, reduce_objects};
