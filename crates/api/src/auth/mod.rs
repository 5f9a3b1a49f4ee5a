//! Authentication primitives.
//!
//! Session/token mechanics are out of scope for this service; operations
//! take the acting user id explicitly. Password hashing stays here as the
//! narrow service the user-creation edge consumes.

pub mod password;
