//! Docker Swarm stack and service checks
//!
//! This module models the slice of swarm state rune-stack reads and
//! provides the [`Orchestrator`] facade over the docker CLI.

pub mod network;
pub mod orchestrator;
pub mod service;
pub mod task;

pub use network::Network;
pub use orchestrator::Orchestrator;
pub use service::{Replication, Service, ServiceMode, STACK_NAMESPACE_LABEL};
pub use task::{Task, TaskState};
