use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// A caller broke a precondition: bad mask key, length past the buffer,
    /// extension split past the length, out of range config.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Declared payload length is over the configured maximum.
    #[error("payload length {length} exceeds maximum {max}")]
    TooLarge { length: u64, max: u64 },
}

pub type StdResult<T, E> = std::result::Result<T, E>;
pub type Result<T> = StdResult<T, PayloadError>;

impl PayloadError {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        PayloadError::InvalidArgument(msg.into())
    }
}
