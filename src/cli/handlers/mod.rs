pub mod bench;
pub mod execution;
pub mod import;
