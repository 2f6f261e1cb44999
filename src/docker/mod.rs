//! docker CLI plumbing
//!
//! Everything rune-stack learns about the swarm comes from running the
//! `docker` client and decoding what it prints.

pub mod cli;
pub mod inspect;

#[cfg(test)]
pub(crate) mod testing;

pub use cli::{ensure_success, CommandOutput, CommandRunner, DockerCli};
pub use inspect::ObjectKind;
