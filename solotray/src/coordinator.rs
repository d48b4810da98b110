use std::{io, net::SocketAddr};

use tokio::net::TcpListener;

use crate::{Config, InstanceId, ModeRequest, RelayClient, Result, SolotrayError};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The role a process settles into after trying the coordination address.
#[derive(Debug)]
pub enum Role {
    /// This process holds the coordination address. The listener is handed to the relay
    /// listener.
    Leader(TcpListener),

    /// Another process holds the coordination address. The request has been relayed, and this
    /// process should exit.
    Follower,
}

/// The coordination state of a process.
///
/// `Leader` lasts until the process exits. `Follower` and `Fatal` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InstanceState {
    /// Role not determined yet.
    #[default]
    Unstarted,

    /// The process is the leader.
    Leader,

    /// The process relayed its request and is exiting.
    Follower,

    /// The coordination address could not be bound.
    Fatal,
}

/// `InstanceCoordinator` decides whether a process leads or follows.
///
/// The OS lets only one socket listen on the coordination address, so the bind itself is the
/// election. There is a single attempt and no retry.
#[derive(Debug)]
pub struct InstanceCoordinator {
    id: InstanceId,
    address: SocketAddr,
    client: RelayClient,
    state: InstanceState,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl InstanceCoordinator {
    /// Creates a coordinator for the configured coordination address.
    pub fn new(id: InstanceId, config: &Config) -> Self {
        Self {
            id,
            address: config.address,
            client: RelayClient::new(config.get_connect_timeout()),
            state: InstanceState::Unstarted,
        }
    }

    /// Binds the coordination address and settles the role of this process.
    ///
    /// If the address is already in use the request is relayed to the leader before returning
    /// [`Role::Follower`]. A failed relay is logged and otherwise ignored. Any other bind error is
    /// returned as [`SolotrayError::BindFailure`].
    pub async fn determine_role(&mut self, request: ModeRequest) -> Result<Role> {
        if self.state != InstanceState::Unstarted {
            return Err(SolotrayError::InvalidState(format!(
                "role already determined: {:?}",
                self.state
            )));
        }

        match TcpListener::bind(self.address).await {
            Ok(listener) => {
                self.state = InstanceState::Leader;
                tracing::info!(
                    id = self.id.to_string(),
                    "Became leader on {}",
                    self.address
                );

                Ok(Role::Leader(listener))
            }
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                self.state = InstanceState::Follower;
                tracing::debug!(
                    id = self.id.to_string(),
                    mode = %request,
                    "Leader already running on {}, relaying request",
                    self.address
                );

                if let Err(e) = self.client.send(self.address, request).await {
                    tracing::debug!(id = self.id.to_string(), "Relay to leader failed: {e}");
                }

                Ok(Role::Follower)
            }
            Err(source) => {
                self.state = InstanceState::Fatal;
                Err(SolotrayError::BindFailure {
                    addr: self.address,
                    source,
                })
            }
        }
    }

    /// Returns the ID of this process.
    pub fn get_id(&self) -> InstanceId {
        self.id
    }

    /// Returns the coordination address.
    pub fn get_address(&self) -> SocketAddr {
        self.address
    }

    /// Returns the coordination state.
    pub fn get_state(&self) -> InstanceState {
        self.state
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
