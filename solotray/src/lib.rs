//! # Solotray
//!
//! Single-instance coordination for a background tray utility. The first process to bind the
//! coordination address becomes the leader and owns the live mode; every later process relays
//! its mode request to the leader and exits.

mod client;
mod config;
mod consumer;
mod coordinator;
mod defaults;
mod error;
mod exit;
mod leader;
mod listener;
mod message;
mod mode;
mod presenter;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod channels;
pub mod utils;

pub use channels::*;
pub use client::*;
pub use config::*;
pub use consumer::*;
pub use coordinator::*;
pub use defaults::*;
pub use error::*;
pub use exit::*;
pub use leader::*;
pub use listener::*;
pub use message::*;
pub use mode::*;
pub use presenter::*;
