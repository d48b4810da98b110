use std::fmt;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// `ModeRequest` is the runtime mode a process asks the leader to run in.
///
/// A follower transmits exactly one of these per connection. The leader's consumer loop holds the
/// currently active value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModeRequest {
    /// Normal operation.
    #[default]
    Normal,

    /// Test mode.
    Test,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ModeRequest {
    /// Selects a mode from the `--test` and `--notest` startup switches.
    ///
    /// `--test` wins if both are somehow set. Neither set means `Normal`.
    pub fn from_flags(test: bool, notest: bool) -> Self {
        match (test, notest) {
            (true, _) => ModeRequest::Test,
            (false, _) => ModeRequest::Normal,
        }
    }

    /// Returns the wire token for this mode.
    pub fn token(&self) -> &'static str {
        match self {
            ModeRequest::Normal => "NOTEST",
            ModeRequest::Test => "TEST",
        }
    }

    /// Parses a wire token. Unknown tokens yield `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "TEST" => Some(ModeRequest::Test),
            "NOTEST" => Some(ModeRequest::Normal),
            _ => None,
        }
    }

    /// Returns `true` if this is the test mode.
    pub fn is_test(&self) -> bool {
        matches!(self, ModeRequest::Test)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl fmt::Display for ModeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeRequest::Normal => write!(f, "normal"),
            ModeRequest::Test => write!(f, "test"),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
