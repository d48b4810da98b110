use std::{net::SocketAddr, time::Duration};

use solotray::{
    utils::mock::MockPresenter, Config, Indicator, InstanceCoordinator, LeaderRuntime,
    ModeHandle, ModeRequest, Presenter, Role,
};
use tokio::{net::TcpListener, sync::mpsc, time};
use uuid::Uuid;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// `LeaderFixture` is a running leader on a free loop-back port with a recording presenter.
pub struct LeaderFixture {
    runtime: LeaderRuntime,
    config: Config,
    indicators_rx: mpsc::UnboundedReceiver<Indicator>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl LeaderFixture {
    /// Elects a leader on a fresh address and starts its runtime with a recording presenter.
    pub async fn start(initial: ModeRequest) -> anyhow::Result<Self> {
        let (presenter, indicators_rx) = MockPresenter::new();
        Self::start_with(initial, presenter, indicators_rx).await
    }

    /// Elects a leader on a fresh address and starts its runtime with `presenter`, whose
    /// indicators arrive on `indicators_rx`.
    pub async fn start_with<P>(
        initial: ModeRequest,
        presenter: P,
        indicators_rx: mpsc::UnboundedReceiver<Indicator>,
    ) -> anyhow::Result<Self>
    where
        P: Presenter + 'static,
    {
        let config = test_config(free_addr().await?);
        let id = Uuid::new_v4();

        let mut coordinator = InstanceCoordinator::new(id, &config);
        let Role::Leader(listener) = coordinator.determine_role(initial).await? else {
            anyhow::bail!("fresh address already has a leader");
        };

        let runtime = LeaderRuntime::start(id, listener, initial, &config, presenter)?;

        Ok(Self {
            runtime,
            config,
            indicators_rx,
        })
    }

    /// Returns the configuration followers should use to find this leader.
    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Returns the leader's mode handle.
    pub fn get_mode_handle(&self) -> &ModeHandle {
        self.runtime.get_mode_handle()
    }

    /// Returns the next indicator the leader presented, if one arrives in time.
    pub async fn next_indicator(&mut self, within: Duration) -> Option<Indicator> {
        time::timeout(within, self.indicators_rx.recv())
            .await
            .ok()
            .flatten()
    }

    /// Stops the leader.
    pub async fn shutdown(self) -> anyhow::Result<ModeRequest> {
        Ok(self.runtime.shutdown().await?)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns a loop-back address that was free a moment ago.
pub async fn free_addr() -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    Ok(listener.local_addr()?)
}

/// Returns a configuration for `address` with short timeouts.
pub fn test_config(address: SocketAddr) -> Config {
    Config::builder()
        .address(address)
        .read_timeout(500)
        .connect_timeout(500)
        .write_exit_marker(false)
        .build()
}

/// Polls the mode handle until it reports `expected` or `within` elapses.
pub async fn wait_for_mode(
    handle: &ModeHandle,
    expected: ModeRequest,
    within: Duration,
) -> anyhow::Result<bool> {
    let deadline = time::Instant::now() + within;
    loop {
        if handle.current_mode().await? == expected {
            return Ok(true);
        }

        if time::Instant::now() >= deadline {
            return Ok(false);
        }

        time::sleep(Duration::from_millis(10)).await;
    }
}
