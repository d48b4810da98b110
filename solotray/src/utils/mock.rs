use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Semaphore};

use crate::{Indicator, Presenter, Result, SolotrayError};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A presenter that forwards every indicator it is given to a channel.
#[derive(Debug)]
pub struct MockPresenter {
    indicators_tx: mpsc::UnboundedSender<Indicator>,
}

/// A presenter that waits for a permit from its gate before each indicator it forwards.
///
/// Holding the gate closed keeps the consumer loop busy, so the notification slot stays occupied.
#[derive(Debug)]
pub struct GatedPresenter {
    gate: Arc<Semaphore>,
    indicators_tx: mpsc::UnboundedSender<Indicator>,
}

/// A presenter that always fails.
#[derive(Debug, Default)]
pub struct FailingPresenter;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MockPresenter {
    /// Creates a presenter and the receiver its indicators arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Indicator>) {
        let (indicators_tx, indicators_rx) = mpsc::unbounded_channel();
        (Self { indicators_tx }, indicators_rx)
    }
}

impl GatedPresenter {
    /// Creates a presenter with a closed gate, the gate, and the receiver its indicators arrive
    /// on. Each permit added to the gate lets one indicator through.
    pub fn new() -> (Self, Arc<Semaphore>, mpsc::UnboundedReceiver<Indicator>) {
        let gate = Arc::new(Semaphore::new(0));
        let (indicators_tx, indicators_rx) = mpsc::unbounded_channel();
        (
            Self {
                gate: Arc::clone(&gate),
                indicators_tx,
            },
            gate,
            indicators_rx,
        )
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl Presenter for MockPresenter {
    async fn present(&mut self, indicator: &Indicator) -> Result<()> {
        self.indicators_tx.send(indicator.clone())?;
        Ok(())
    }
}

#[async_trait]
impl Presenter for GatedPresenter {
    async fn present(&mut self, indicator: &Indicator) -> Result<()> {
        self.gate
            .acquire()
            .await
            .map_err(|_| SolotrayError::custom("presenter gate closed"))?
            .forget();

        self.indicators_tx.send(indicator.clone())?;
        Ok(())
    }
}

#[async_trait]
impl Presenter for FailingPresenter {
    async fn present(&mut self, _: &Indicator) -> Result<()> {
        Err(SolotrayError::custom("presenter unavailable"))
    }
}
