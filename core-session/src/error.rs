use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Failed to serialize {context}: {source}")]
    SerializationFailed {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<BridgeError> for SessionError {
    fn from(error: BridgeError) -> Self {
        SessionError::StorageUnavailable(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
