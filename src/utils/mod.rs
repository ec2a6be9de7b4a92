pub mod fs;
pub mod timestamp;
