use thiserror::Error;

/// Transport-neutral error category; the RPC layer maps it to a status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Internal,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error("{message}: {detail}")]
    Internal { message: &'static str, detail: String },
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn kind(&self) -> ErrorKind {
        use models::errors::ModelError;
        match self {
            Self::Validation(_) | Self::Model(ModelError::Validation(_)) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Db(_) | Self::Model(ModelError::Db(_)) | Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Wrap storage failures under a stable public message. Validation and
    /// not-found errors pass through unchanged.
    pub fn internal(self, message: &'static str) -> Self {
        match self.kind() {
            ErrorKind::Internal => match self {
                Self::Internal { .. } => self,
                other => Self::Internal { message, detail: other.to_string() },
            },
            _ => self,
        }
    }

    /// Message safe to return to callers; storage details stay in the logs.
    pub fn public_message(&self) -> String {
        use models::errors::ModelError;
        match self {
            Self::Validation(m) | Self::NotFound(m) | Self::Model(ModelError::Validation(m)) => m.clone(),
            Self::Internal { message, .. } => (*message).to_string(),
            Self::Db(_) | Self::Model(ModelError::Db(_)) => "internal error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn model_validation_is_invalid_argument() {
        let e: ServiceError = ModelError::Validation("name is required".into()).into();
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        assert_eq!(e.public_message(), "name is required");
    }

    #[test]
    fn internal_hides_detail() {
        let e = ServiceError::Db("connection refused".into()).internal("failed to get company");
        assert_eq!(e.kind(), ErrorKind::Internal);
        assert_eq!(e.public_message(), "failed to get company");
        assert!(e.to_string().contains("connection refused"));
    }

    #[test]
    fn internal_keeps_not_found() {
        let e = ServiceError::not_found("company").internal("failed to update company");
        assert_eq!(e.kind(), ErrorKind::NotFound);
        assert_eq!(e.public_message(), "company not found");
    }

    #[test]
    fn first_context_wins() {
        let e = ServiceError::Db("x".into()).internal("failed to list companies").internal("other");
        assert_eq!(e.public_message(), "failed to list companies");
    }
}
