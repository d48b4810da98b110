//! Error types of the solotray crate.

use std::{fmt::Display, io, net::SocketAddr, time::Duration};

use thiserror::Error;

use crate::DecodeError;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A specialized `Result` type for solotray crate.
pub type Result<T> = std::result::Result<T, SolotrayError>;

/// The main error type of the solotray crate.
#[derive(Debug, Error)]
pub enum SolotrayError {
    /// Custom error.
    #[error("{0}")]
    Message(String),

    /// The coordination address could not be bound for a reason other than it being in use.
    #[error("failed to bind coordination address {addr}: {source}")]
    BindFailure {
        /// The address that could not be bound.
        addr: SocketAddr,

        /// The underlying io error.
        #[source]
        source: io::Error,
    },

    /// A follower could not connect or write its request to the leader.
    #[error("failed to relay mode request: {0}")]
    RelaySendFailure(#[source] io::Error),

    /// A follower gave up connecting to the leader.
    #[error("timed out relaying mode request to {0}")]
    RelayTimeout(SocketAddr),

    /// A follower connected but sent nothing in time.
    #[error("timed out after {0:?} waiting for payload")]
    ReadTimeout(Duration),

    /// A payload could not be decoded into a mode request.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The configuration is invalid or could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// Io error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Tokio channel send error.
    #[error("tokio channel send error: {0}")]
    TokioSendError(String),

    /// A spawned task panicked or was cancelled.
    #[error("task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// The consumer loop is no longer running.
    #[error("mode consumer is not running")]
    ChannelClosed,

    /// An operation was attempted in the wrong instance state.
    #[error("invalid instance state: {0}")]
    InvalidState(String),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl SolotrayError {
    /// Creates a new `Err` result.
    pub fn custom(msg: impl Display) -> SolotrayError {
        SolotrayError::Message(msg.to_string())
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for SolotrayError {
    fn from(err: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Self::TokioSendError(err.to_string())
    }
}

impl From<toml::de::Error> for SolotrayError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates a new `Ok` result.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> Result<T> {
    Result::Ok(value)
}
