pub mod cli;
pub mod data;
pub mod entity;
pub mod error;
pub mod server;

pub use error::DirectoryError;
