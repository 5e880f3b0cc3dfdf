use thiserror::Error;

/// Failures produced by the leiscope client layer.
///
/// Every variant renders the message a user gets to see once a task run
/// catches it, so `to_string()` is the single error string of a run.
#[derive(Error, Debug)]
pub enum LeiscopeError {
  /// Transport failure: refused connection, timeout, broken body.
  #[error("Connection error: {message}")]
  Connection { message: String },

  /// The service answered with a well-formed payload carrying an error field.
  #[error("{message}")]
  Service { message: String },

  /// The service answered with a non-success HTTP status.
  #[error("Request to {endpoint} failed: HTTP {status}")]
  Http { endpoint: String, status: u16 },

  /// The body could not be decoded as the expected JSON shape.
  #[error("Failed to decode response from {endpoint}: {message}")]
  Decode { endpoint: String, message: String },

  /// The payload was valid JSON but lacked the data it should carry.
  #[error("{message}")]
  UnexpectedResponse { message: String },

  #[error("Invalid configuration: {message}")]
  Config { message: String },

  /// A newer run started before this one resolved.
  #[error("Superseded by a newer request")]
  Superseded,
}

impl LeiscopeError {
  pub fn service(message: impl Into<String>) -> Self {
    LeiscopeError::Service { message: message.into() }
  }

  pub fn unexpected(message: impl Into<String>) -> Self {
    LeiscopeError::UnexpectedResponse { message: message.into() }
  }

  pub fn config(message: impl Into<String>) -> Self {
    LeiscopeError::Config { message: message.into() }
  }

  pub fn is_superseded(&self) -> bool {
    matches!(self, LeiscopeError::Superseded)
  }
}

impl From<reqwest::Error> for LeiscopeError {
  fn from(err: reqwest::Error) -> Self {
    LeiscopeError::Connection { message: err.to_string() }
  }
}

pub type Result<T> = std::result::Result<T, LeiscopeError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_connection_error_message() {
    let err = LeiscopeError::Connection { message: "refused".to_string() };
    assert_eq!(err.to_string(), "Connection error: refused");
  }

  #[test]
  fn test_service_error_is_verbatim() {
    let err = LeiscopeError::service("LEI not found for this company");
    assert_eq!(err.to_string(), "LEI not found for this company");
  }

  #[test]
  fn test_superseded_detection() {
    assert!(LeiscopeError::Superseded.is_superseded());
    assert!(!LeiscopeError::unexpected("x").is_superseded());
  }
}
