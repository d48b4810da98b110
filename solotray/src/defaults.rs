use std::net::{IpAddr, Ipv4Addr, SocketAddr};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The well-known port the leader binds on the loop-back interface.
pub const DEFAULT_COORDINATION_PORT: u16 = 12345;

/// The default coordination address.
pub const DEFAULT_COORDINATION_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_COORDINATION_PORT);

/// The default time (in milliseconds) a decode task waits for a follower's payload.
pub const DEFAULT_READ_TIMEOUT: u64 = 2000;

/// The default time (in milliseconds) a follower waits to connect to the leader.
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 1000;

/// The size of the buffer a decode task reads a payload into.
pub const READ_BUFFER_SIZE: usize = 1024;

/// The default title shown by the presentation layer.
pub const DEFAULT_TITLE: &str = "Micman 2";
