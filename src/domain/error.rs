use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// The call to the model endpoint failed, timed out, or returned a non-success status.
    #[error("Error invoking {service}: {message}")]
    Network { service: String, message: String },

    /// The endpoint answered with structured data lacking `results[0].outputText`.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Input too short: {0}")]
    EmptyInput(String),

    #[error("Input too long: {0}")]
    InputTooLong(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DomainError {
    pub fn network(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn input_too_long(msg: impl Into<String>) -> Self {
        Self::InputTooLong(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_renders_service_prefix() {
        let err = DomainError::network("Bedrock", "connection refused");
        assert_eq!(err.to_string(), "Error invoking Bedrock: connection refused");
    }

    #[test]
    fn not_found_is_classified() {
        assert!(DomainError::not_found("x").is_not_found());
        assert!(!DomainError::empty_input("x").is_not_found());
    }
}
