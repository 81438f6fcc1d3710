use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed payload: expected {expected} fields, got {got}")]
    MalformedPayload { expected: usize, got: usize },

    #[error("Nonce {0} outside the nonce space")]
    NonceOutOfRange(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
