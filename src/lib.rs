pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod pipeline;
pub mod publish;

pub use error::TokenError;
