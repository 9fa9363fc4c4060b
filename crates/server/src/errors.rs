use service::errors::{ErrorKind, ServiceError};
use thiserror::Error;
use tonic::{Code, Status};
use tracing::{debug, error};

/// Map a service error onto a gRPC status with a caller-safe message.
pub fn to_status(err: &ServiceError) -> Status {
    let code = match err.kind() {
        ErrorKind::InvalidArgument => Code::InvalidArgument,
        ErrorKind::NotFound => Code::NotFound,
        ErrorKind::Internal => Code::Internal,
    };
    if code == Code::Internal {
        error!(error = %err, "rpc failed");
    } else {
        debug!(error = %err, "rpc rejected");
    }
    Status::new(code, err.public_message())
}

/// Label used in metrics and logs.
pub fn code_label(code: Code) -> &'static str {
    match code {
        Code::Ok => "OK",
        Code::InvalidArgument => "INVALID_ARGUMENT",
        Code::NotFound => "NOT_FOUND",
        Code::Internal => "INTERNAL",
        _ => "OTHER",
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
