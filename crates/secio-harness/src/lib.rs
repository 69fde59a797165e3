//! Deterministic simulation harness for secio testing.
//!
//! - [`SimEnv`]: seeded randomness so handshake nonces repeat per seed
//! - [`MemoryTransport`]: in-process transport pairs with an optional hook
//!   that rewrites outgoing messages for fault injection
//! - [`fixtures`]: deterministic identity keys
//! - [`sim_net`]: secio over turmoil's simulated TCP

#![forbid(unsafe_code)]

pub mod fixtures;
pub mod memory_transport;
pub mod sim_env;
pub mod sim_net;

pub use memory_transport::{MemoryTransport, TamperHook};
pub use sim_env::SimEnv;
