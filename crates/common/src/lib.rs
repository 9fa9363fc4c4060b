use thiserror::Error;

pub mod types;
pub mod utils;
pub mod env;
pub mod identity;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("configuration error: {0}")]
    Config(String),
}
