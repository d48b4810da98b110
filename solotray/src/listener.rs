use std::{net::SocketAddr, time::Duration};

use tokio::{
    io::AsyncReadExt,
    net::{TcpListener, TcpStream},
    task::JoinHandle,
    time,
};

use crate::{FlagMessage, InstanceId, NotificationSender, Result, SolotrayError, READ_BUFFER_SIZE};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// `RelayListener` accepts follower connections on the coordination address for the lifetime of
/// the leader.
///
/// Each connection is decoded on its own task so a follower that connects and stalls cannot hold
/// up the accept loop. Nothing a follower sends can stop the listener.
///
/// A connection is read once. Followers write their whole message in one write, so a payload
/// split across several writes is decoded from its first part only and usually discarded.
pub struct RelayListener {
    id: InstanceId,
    listener: TcpListener,
    notifications: NotificationSender,
    read_timeout: Duration,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl RelayListener {
    /// Creates a relay listener over an already bound coordination listener.
    pub fn new(
        id: InstanceId,
        listener: TcpListener,
        notifications: NotificationSender,
        read_timeout: Duration,
    ) -> Self {
        Self {
            id,
            listener,
            notifications,
            read_timeout,
        }
    }

    /// Starts the accept loop. The loop only ends when the task is aborted.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        if let Ok(addr) = self.listener.local_addr() {
            tracing::debug!(id = self.id.to_string(), "Relay listener accepting on {addr}");
        }

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!(id = self.id.to_string(), "Failed to accept connection: {e}");
                    continue;
                }
            };

            let id = self.id;
            let notifications = self.notifications.clone();
            let read_timeout = self.read_timeout;

            tokio::spawn(async move {
                handle_connection(id, stream, peer, notifications, read_timeout).await;
            });
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Decodes a single follower connection and pushes its request.
async fn handle_connection(
    id: InstanceId,
    stream: TcpStream,
    peer: SocketAddr,
    notifications: NotificationSender,
    read_timeout: Duration,
) {
    let message = match read_message(stream, read_timeout).await {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(id = id.to_string(), %peer, "Discarding connection: {e}");
            return;
        }
    };

    tracing::debug!(
        id = id.to_string(),
        %peer,
        follower_port = ?message.follower_port,
        mode = %message.mode,
        "Received mode request"
    );

    notifications.push(message.mode);
}

/// Reads one payload from the stream and decodes it.
async fn read_message(mut stream: TcpStream, read_timeout: Duration) -> Result<FlagMessage> {
    let mut buf = [0; READ_BUFFER_SIZE];
    let len = time::timeout(read_timeout, stream.read(&mut buf))
        .await
        .map_err(|_| SolotrayError::ReadTimeout(read_timeout))??;

    Ok(FlagMessage::decode(&buf[..len])?)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tokio::io::AsyncWriteExt;
    use uuid::Uuid;

    use super::*;
    use crate::{channels, ConsumerSideChannels, DecodeError, ModeRequest};

    async fn start_listener(
        read_timeout: Duration,
    ) -> anyhow::Result<(SocketAddr, JoinHandle<()>, ConsumerSideChannels)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (consumer_channels, outside) = channels::create();
        let handle = RelayListener::new(
            Uuid::new_v4(),
            listener,
            outside.notification_tx,
            read_timeout,
        )
        .start();

        Ok((addr, handle, consumer_channels))
    }

    async fn send_raw(addr: SocketAddr, payload: &[u8]) -> anyhow::Result<()> {
        let mut stream = TcpStream::connect(addr).await?;
        stream.write_all(payload).await?;
        stream.shutdown().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_listener_pushes_decoded_request() -> anyhow::Result<()> {
        let (addr, _handle, mut consumer) = start_listener(Duration::from_secs(1)).await?;

        send_raw(addr, b"FLAG:40000:TEST").await?;

        let mode = time::timeout(Duration::from_secs(1), consumer.notification_rx.recv()).await?;
        assert_eq!(mode, Some(ModeRequest::Test));

        Ok(())
    }

    #[tokio::test]
    async fn test_listener_discards_malformed_payloads() -> anyhow::Result<()> {
        let (addr, handle, mut consumer) = start_listener(Duration::from_secs(1)).await?;

        send_raw(addr, b"FLAG:").await?;
        send_raw(addr, b"FLAG:1234:GARBAGE").await?;
        send_raw(addr, b"HELLO").await?;
        send_raw(addr, b"").await?;

        let received =
            time::timeout(Duration::from_millis(200), consumer.notification_rx.recv()).await;
        assert!(received.is_err());
        assert!(!handle.is_finished());

        // Still serving after the garbage.
        send_raw(addr, b"FLAG:1234:NOTEST").await?;
        let mode = time::timeout(Duration::from_secs(1), consumer.notification_rx.recv()).await?;
        assert_eq!(mode, Some(ModeRequest::Normal));

        Ok(())
    }

    #[tokio::test]
    async fn test_silent_follower_does_not_block_others() -> anyhow::Result<()> {
        let (addr, _handle, mut consumer) = start_listener(Duration::from_millis(100)).await?;

        // Connects and never writes.
        let _silent = TcpStream::connect(addr).await?;

        send_raw(addr, b"FLAG:1234:TEST").await?;
        let mode = time::timeout(Duration::from_secs(1), consumer.notification_rx.recv()).await?;
        assert_eq!(mode, Some(ModeRequest::Test));

        Ok(())
    }

    #[tokio::test]
    async fn test_read_times_out_on_silent_follower() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let _silent = TcpStream::connect(addr).await?;
        let (stream, _) = listener.accept().await?;

        let result = read_message(stream, Duration::from_millis(50)).await;
        assert!(matches!(result, Err(SolotrayError::ReadTimeout(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_read_reports_decode_failure() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        send_raw(addr, b"FLAG:1234:GARBAGE").await?;
        let (stream, _) = listener.accept().await?;

        let result = read_message(stream, Duration::from_secs(1)).await;
        assert!(matches!(
            result,
            Err(SolotrayError::Decode(DecodeError::UnknownMode(_)))
        ));

        Ok(())
    }
}
