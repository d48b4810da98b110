//! Utilities for embedding and testing solotray.

pub mod mock;
