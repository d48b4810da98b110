//! The wire format spoken between a follower and the leader.
//!
//! A message is a single line of text with no terminator:
//!
//! ```text
//! FLAG:<follower_port>[:<MODE>]
//! ```
//!
//! where `MODE` is `TEST` or `NOTEST`. Messages without a mode are well-formed on the wire but
//! carry no request, so decoding them fails.

use std::str;

use thiserror::Error;

use crate::ModeRequest;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The prefix every message starts with.
pub const FLAG_PREFIX: &str = "FLAG:";

const FIELD_SEPARATOR: char = ':';

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// `FlagMessage` is the decoded form of a follower's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagMessage {
    /// The follower's local port. Informational only.
    pub follower_port: Option<u16>,

    /// The requested mode.
    pub mode: ModeRequest,
}

/// Reasons a payload is discarded by the leader.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload is not valid UTF-8.
    #[error("payload is not valid utf-8")]
    InvalidUtf8,

    /// The payload does not start with `FLAG:`.
    #[error("payload does not start with \"FLAG:\"")]
    MissingPrefix,

    /// The payload has no mode field.
    #[error("payload has no mode field")]
    MissingMode,

    /// The mode field is not a known token.
    #[error("unknown mode token: {0:?}")]
    UnknownMode(String),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl FlagMessage {
    /// Creates a new message.
    pub fn new(follower_port: u16, mode: ModeRequest) -> Self {
        Self {
            follower_port: Some(follower_port),
            mode,
        }
    }

    /// Encodes the message into its wire form.
    pub fn encode(&self) -> Vec<u8> {
        let port = self
            .follower_port
            .map(|port| port.to_string())
            .unwrap_or_default();

        format!(
            "{FLAG_PREFIX}{port}{FIELD_SEPARATOR}{}",
            self.mode.token()
        )
        .into_bytes()
    }

    /// Decodes a payload read from a follower.
    ///
    /// Only the second field decides the outcome. The port field is parsed if it can be and
    /// ignored otherwise, and fields after the mode are ignored.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let text = str::from_utf8(payload).map_err(|_| DecodeError::InvalidUtf8)?;
        let rest = text
            .strip_prefix(FLAG_PREFIX)
            .ok_or(DecodeError::MissingPrefix)?;

        let mut fields = rest.split(FIELD_SEPARATOR);
        let follower_port = fields.next().and_then(|port| port.parse().ok());
        let token = fields.next().ok_or(DecodeError::MissingMode)?;
        let mode = ModeRequest::from_token(token)
            .ok_or_else(|| DecodeError::UnknownMode(token.to_string()))?;

        Ok(Self {
            follower_port,
            mode,
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
