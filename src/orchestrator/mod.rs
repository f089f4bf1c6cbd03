//! Request validation, cache lookup, generation and persistence.

pub mod locks;
pub mod request;
pub mod service;
