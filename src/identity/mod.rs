pub mod digest;
pub mod query;
