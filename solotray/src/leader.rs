use std::net::SocketAddr;

use tokio::{net::TcpListener, task::JoinHandle};

use crate::{
    channels, Config, InstanceId, ModeConsumer, ModeHandle, ModeRequest, Presenter,
    RelayListener, Result,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// `LeaderRuntime` runs the leader side of coordination: the relay listener feeding the mode
/// consumer loop through the notification channel.
pub struct LeaderRuntime {
    id: InstanceId,
    local_addr: SocketAddr,
    mode_handle: ModeHandle,
    listener_handle: JoinHandle<()>,
    consumer_handle: JoinHandle<ModeRequest>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl LeaderRuntime {
    /// Starts the consumer loop holding `initial` and the relay listener over `listener`.
    pub fn start<P>(
        id: InstanceId,
        listener: TcpListener,
        initial: ModeRequest,
        config: &Config,
        presenter: P,
    ) -> Result<Self>
    where
        P: Presenter + 'static,
    {
        let local_addr = listener.local_addr()?;
        let (consumer_channels, outside_channels) = channels::create();

        let consumer_handle = ModeConsumer::new(
            id,
            initial,
            config.title.clone(),
            presenter,
            consumer_channels,
        )
        .start();

        let listener_handle = RelayListener::new(
            id,
            listener,
            outside_channels.notification_tx,
            config.get_read_timeout(),
        )
        .start();

        tracing::debug!(id = id.to_string(), "Started leader runtime on {local_addr}");

        Ok(Self {
            id,
            local_addr,
            mode_handle: ModeHandle::new(outside_channels.query_tx, outside_channels.shutdown_tx),
            listener_handle,
            consumer_handle,
        })
    }

    /// Returns a handle for reading the current mode.
    pub fn get_mode_handle(&self) -> &ModeHandle {
        &self.mode_handle
    }

    /// Returns the address the relay listener is bound to.
    pub fn get_local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops the listener and the consumer loop, releasing the coordination address.
    ///
    /// Connections still being decoded are abandoned. Returns the last mode held.
    pub async fn shutdown(self) -> Result<ModeRequest> {
        self.listener_handle.abort();
        // Cancelled is the expected outcome; awaiting makes sure the socket is closed.
        let _ = self.listener_handle.await;

        self.mode_handle.shutdown().await?;
        let mode = self.consumer_handle.await?;

        tracing::debug!(id = self.id.to_string(), mode = %mode, "Leader runtime stopped");

        Ok(mode)
    }
}
