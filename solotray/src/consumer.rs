use tokio::{sync::mpsc, task::JoinHandle};
use uuid::Uuid;

use crate::{ConsumerSideChannels, Indicator, ModeRequest, Presenter, Result, SolotrayError};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Instance ID, attached to log events of a process.
pub type InstanceId = Uuid;

/// `ModeConsumer` is the single owner of the process's current mode.
///
/// It drains the notification channel, replaces the mode with every request it receives and
/// hands the matching [`Indicator`] to the presenter. Nothing else writes the mode; readers ask
/// the loop through a [`ModeHandle`].
pub struct ModeConsumer<P>
where
    P: Presenter,
{
    id: InstanceId,
    mode: ModeRequest,
    title: String,
    presenter: P,
    channels: ConsumerSideChannels,
}

/// A cloneable handle for reading the current mode and stopping the consumer loop.
#[derive(Debug, Clone)]
pub struct ModeHandle {
    query_tx: mpsc::UnboundedSender<mpsc::Sender<ModeRequest>>,
    shutdown_tx: mpsc::Sender<()>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl<P> ModeConsumer<P>
where
    P: Presenter + 'static,
{
    /// Creates a consumer holding `initial` as the current mode.
    pub fn new(
        id: InstanceId,
        initial: ModeRequest,
        title: impl Into<String>,
        presenter: P,
        channels: ConsumerSideChannels,
    ) -> Self {
        Self {
            id,
            mode: initial,
            title: title.into(),
            presenter,
            channels,
        }
    }

    /// Starts the consumer loop. The task resolves to the last mode it held.
    pub fn start(self) -> JoinHandle<ModeRequest> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) -> ModeRequest {
        tracing::debug!(id = self.id.to_string(), mode = %self.mode, "Mode consumer started");

        let initial = self.mode;
        self.present(initial).await;

        loop {
            tokio::select! {
                // Dropped handles only disable this branch. The loop lives as long as the leader.
                Some(()) = self.channels.shutdown_rx.recv() => {
                    break;
                },
                Some(mode) = self.channels.notification_rx.recv() => {
                    self.apply(mode).await;
                },
                Some(reply_tx) = self.channels.query_rx.recv() => {
                    // The asker may have given up.
                    let _ = reply_tx.send(self.mode).await;
                },
                else => {
                    break;
                },
            }
        }

        tracing::debug!(id = self.id.to_string(), mode = %self.mode, "Mode consumer stopped");

        self.mode
    }

    async fn apply(&mut self, mode: ModeRequest) {
        if mode != self.mode {
            tracing::info!(
                id = self.id.to_string(),
                from = %self.mode,
                to = %mode,
                "Switching mode"
            );
        }

        self.mode = mode;
        self.present(mode).await;
    }

    async fn present(&mut self, mode: ModeRequest) {
        let indicator = Indicator::for_mode(&self.title, mode);
        if let Err(e) = self.presenter.present(&indicator).await {
            tracing::warn!(id = self.id.to_string(), "Failed to present mode: {e}");
        }
    }
}

impl ModeHandle {
    /// Creates a handle from the outside ends of the consumer channels.
    pub fn new(
        query_tx: mpsc::UnboundedSender<mpsc::Sender<ModeRequest>>,
        shutdown_tx: mpsc::Sender<()>,
    ) -> Self {
        Self {
            query_tx,
            shutdown_tx,
        }
    }

    /// Returns the mode currently held by the consumer loop.
    pub async fn current_mode(&self) -> Result<ModeRequest> {
        let (reply_tx, mut reply_rx) = mpsc::channel(1);
        self.query_tx
            .send(reply_tx)
            .map_err(|_| SolotrayError::ChannelClosed)?;

        reply_rx.recv().await.ok_or(SolotrayError::ChannelClosed)
    }

    /// Stops the consumer loop.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown_tx.send(()).await?;
        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
