//! Swarm networks as reported by `docker inspect --type network`

use super::service::STACK_NAMESPACE_LABEL;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Network, reduced to identity and labels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Network {
    /// Network ID
    #[serde(rename = "Id", default)]
    pub id: String,
    /// Network name
    #[serde(default)]
    pub name: String,
    /// Driver (overlay for stack networks)
    #[serde(default)]
    pub driver: String,
    /// Network labels; docker prints null when there are none
    #[serde(default)]
    pub labels: Option<HashMap<String, String>>,
}

impl Network {
    /// Stack namespace label, if the network belongs to a stack
    pub fn stack(&self) -> Option<&str> {
        self.labels
            .as_ref()
            .and_then(|labels| labels.get(STACK_NAMESPACE_LABEL))
            .map(String::as_str)
    }

    pub fn belongs_to(&self, stack: &str) -> bool {
        self.stack() == Some(stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_network() {
        let network: Network = serde_json::from_str(
            r#"{
                "Name": "app_default",
                "Id": "k3x9",
                "Driver": "overlay",
                "Labels": {"com.docker.stack.namespace": "app"}
            }"#,
        )
        .unwrap();

        assert_eq!(network.stack(), Some("app"));
        assert!(network.belongs_to("app"));
        assert!(!network.belongs_to("application"));
    }

    #[test]
    fn test_null_labels() {
        let network: Network =
            serde_json::from_str(r#"{"Name": "bridge", "Id": "b1", "Labels": null}"#).unwrap();
        assert_eq!(network.stack(), None);
        assert!(!network.belongs_to("bridge"));
    }
}
