/// Failure surfaced by an API call or a controller operation.
///
/// Every failure is terminal for that attempt; nothing in the client
/// retries. `Auth` means the stored credential was rejected and has
/// already been evicted from the session store by the time the error
/// reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("authentication required")]
    Auth,

    #[error("network error: {0}")]
    Network(String),

    #[error("request rejected ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// The server-supplied message, verbatim, when the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Client { message, .. } | ApiError::Server { message, .. }
                if !message.is_empty() =>
            {
                Some(message)
            }
            _ => None,
        }
    }

    /// HTTP status of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Client { status, .. } | ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
