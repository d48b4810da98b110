//! The communication channels between the relay listener and the mode consumer loop.
//!
//! The notification path is a single-slot buffer. A push while the slot is still occupied is
//! dropped, so rapid mode switches coalesce and intermediate requests can be lost. Pushes never
//! wait on the consumer.

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::ModeRequest;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The sending half of the notification channel, held by the listener's decode tasks.
#[derive(Debug, Clone)]
pub struct NotificationSender {
    tx: mpsc::Sender<ModeRequest>,
}

/// The outcome of pushing a mode request onto the notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The request now occupies the slot.
    Enqueued,

    /// The slot already held an undelivered request, so this one was dropped.
    Coalesced,

    /// The consumer loop is gone.
    Closed,
}

/// The channels the consumer loop reads from.
pub struct ConsumerSideChannels {
    /// Channel for the consumer to receive decoded mode requests.
    pub notification_rx: mpsc::Receiver<ModeRequest>,

    /// Channel for the consumer to receive reads of the current mode.
    pub query_rx: mpsc::UnboundedReceiver<mpsc::Sender<ModeRequest>>,

    /// Channel for the consumer to receive a shutdown signal.
    pub shutdown_rx: mpsc::Receiver<()>,
}

/// The channels for communicating with the consumer loop from the outside.
pub struct OutsideChannels {
    /// Channel for pushing decoded mode requests to the consumer.
    pub notification_tx: NotificationSender,

    /// Channel for asking the consumer for the current mode.
    pub query_tx: mpsc::UnboundedSender<mpsc::Sender<ModeRequest>>,

    /// Channel for sending a shutdown signal to the consumer.
    pub shutdown_tx: mpsc::Sender<()>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl NotificationSender {
    /// Pushes a mode request without waiting.
    pub fn push(&self, mode: ModeRequest) -> PushOutcome {
        match self.tx.try_send(mode) {
            Ok(()) => PushOutcome::Enqueued,
            Err(TrySendError::Full(dropped)) => {
                tracing::debug!(mode = %dropped, "Notification slot occupied, dropping request");
                PushOutcome::Coalesced
            }
            Err(TrySendError::Closed(dropped)) => {
                tracing::debug!(mode = %dropped, "Mode consumer is gone, dropping request");
                PushOutcome::Closed
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates a new set of channels for the mode consumer loop.
pub fn create() -> (ConsumerSideChannels, OutsideChannels) {
    let (notification_tx, notification_rx) = mpsc::channel(1);
    let (query_tx, query_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    (
        ConsumerSideChannels {
            notification_rx,
            query_rx,
            shutdown_rx,
        },
        OutsideChannels {
            notification_tx: NotificationSender {
                tx: notification_tx,
            },
            query_tx,
            shutdown_tx,
        },
    )
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
