//! Swarm service specification as reported by `docker inspect --type service`

use crate::error::{Result, StackError};
use serde::{Deserialize, Serialize};

/// Label docker puts on every object deployed as part of a stack
pub const STACK_NAMESPACE_LABEL: &str = "com.docker.stack.namespace";

/// Swarm service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Service {
    /// Service ID
    #[serde(rename = "ID", default)]
    pub id: String,
    /// Service specification
    pub spec: ServiceSpec,
}

impl Service {
    /// Resolve the scheduling mode, failing on modes replication cannot be judged for
    pub fn mode(&self) -> Result<ServiceMode> {
        self.spec.mode.resolve().ok_or_else(|| {
            StackError::Operation(format!(
                "Cannot check replication state of service {}, unknown service mode",
                self.spec.name
            ))
        })
    }
}

/// Service specification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceSpec {
    /// Service name
    #[serde(default)]
    pub name: String,
    /// Service mode, exactly one key is set by docker
    #[serde(default)]
    pub mode: ModeSpec,
}

/// Raw `Spec.Mode` object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModeSpec {
    pub replicated: Option<ReplicatedSpec>,
    pub global: Option<serde_json::Value>,
    pub replicated_job: Option<serde_json::Value>,
    pub global_job: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplicatedSpec {
    #[serde(default)]
    pub replicas: u64,
}

impl ModeSpec {
    /// Replicated or global mode; jobs and empty modes yield None
    pub fn resolve(&self) -> Option<ServiceMode> {
        if let Some(replicated) = &self.replicated {
            Some(ServiceMode::Replicated {
                replicas: replicated.replicas,
            })
        } else if self.global.is_some() {
            Some(ServiceMode::Global)
        } else {
            None
        }
    }
}

/// Service mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    /// Fixed number of replicas
    Replicated { replicas: u64 },
    /// One task per cluster node
    Global,
}

/// Desired versus running task counts of one service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replication {
    pub desired: u64,
    pub running: u64,
}

impl Replication {
    /// Desired count for `mode`; `node_count` is only consulted for global services
    pub fn desired_for(mode: ServiceMode, node_count: impl FnOnce() -> Result<u64>) -> Result<u64> {
        match mode {
            ServiceMode::Replicated { replicas } => Ok(replicas),
            ServiceMode::Global => node_count(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.running == self.desired
    }
}
