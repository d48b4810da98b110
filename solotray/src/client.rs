use std::{net::SocketAddr, time::Duration};

use tokio::{io::AsyncWriteExt, net::TcpStream, time};

use crate::{FlagMessage, ModeRequest, Result, SolotrayError};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// `RelayClient` forwards a follower's mode request to the leader.
///
/// Delivery is fire-and-forget: the request is written once and the connection is closed
/// without waiting for an acknowledgement.
#[derive(Debug, Clone)]
pub struct RelayClient {
    connect_timeout: Duration,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl RelayClient {
    /// Creates a client that waits at most `connect_timeout` for the leader to accept.
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    /// Sends `request` to the leader at `addr`.
    pub async fn send(&self, addr: SocketAddr, request: ModeRequest) -> Result<()> {
        let mut stream = time::timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| SolotrayError::RelayTimeout(addr))?
            .map_err(SolotrayError::RelaySendFailure)?;

        // The follower port is the local end of this connection.
        let follower_port = stream
            .local_addr()
            .map_err(SolotrayError::RelaySendFailure)?
            .port();
        let payload = FlagMessage::new(follower_port, request).encode();

        stream
            .write_all(&payload)
            .await
            .map_err(SolotrayError::RelaySendFailure)?;

        // Best effort. The leader has the payload once the write succeeded.
        let _ = stream.shutdown().await;

        tracing::debug!(%addr, follower_port, mode = %request, "Relayed mode request");

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for RelayClient {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::DEFAULT_CONNECT_TIMEOUT))
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
