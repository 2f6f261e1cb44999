//! rune-stack - Docker Swarm stack housekeeping
//!
//! rune-stack drives a swarm through the `docker` client. It provides:
//!
//! - Stack removal that waits until the stack network is gone
//! - Stack service and network lookups
//! - Replication and stability checks for services

pub mod config;
pub mod docker;
pub mod error;
pub mod swarm;

pub use config::StackConfig;
pub use error::{Result, StackError};
pub use swarm::Orchestrator;
