use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Session error: {0}")]
    Session(#[from] core_session::SessionError),

    #[error("Request failed: {0}")]
    Gateway(#[from] core_gateway::GatewayError),
}

impl ServiceError {
    /// The gateway error behind this failure, if it came from a request.
    pub fn gateway_error(&self) -> Option<&core_gateway::GatewayError> {
        match self {
            ServiceError::Gateway(error) => Some(error),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
