//! Request handlers, one module per resource.

pub mod adoptions;
pub mod animals;
pub mod dashboard;
pub mod import;
pub mod rescues;
pub mod trash;
pub mod users;
