pub mod fs;
pub mod gateway;
pub mod memory;
