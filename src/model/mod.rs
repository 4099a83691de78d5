pub mod comment;
pub mod config;

pub use comment::*;
pub use config::*;
