use thiserror::Error;

/// A round rejected at the ingestion boundary
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    #[error("Round is missing its id")]
    MissingId,

    #[error("Invalid round id: {0}")]
    InvalidId(String),

    #[error("Invalid number for round {id}: {raw:?}")]
    InvalidNumber { id: u64, raw: String },

    #[error("Number out of range for round {id}: {number} > 9")]
    NumberOutOfRange { id: u64, number: u8 },
}

/// Errors raised by the upstream result feed
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed returned unexpected status: {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Malformed feed payload: {reason}")]
    MalformedPayload { reason: String },
}
