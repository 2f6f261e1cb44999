//! `docker inspect` decoding

use super::cli::{ensure_success, CommandRunner};
use crate::error::{Result, StackError};
use serde::de::DeserializeOwned;

/// Object types accepted by `docker inspect --type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Service,
    Network,
    Task,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Service => "service",
            ObjectKind::Network => "network",
            ObjectKind::Task => "task",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inspect one object and decode the first element of the result array
pub fn inspect<T, R>(runner: &R, kind: ObjectKind, name: &str) -> Result<T>
where
    T: DeserializeOwned,
    R: CommandRunner + ?Sized,
{
    let output = runner.run(&["inspect", "--type", kind.as_str(), name])?;
    ensure_success(&format!("Failed inspecting {} {}", kind, name), &output)?;

    let text = output
        .stdout_text()
        .ok_or_else(|| StackError::Decode(format!("Empty inspect output for {} {}", kind, name)))?;

    decode_first(&text).map_err(|e| match e {
        StackError::NotFound(_) => StackError::NotFound(format!("{} {}", kind, name)),
        StackError::Json(e) => {
            StackError::Decode(format!("Unexpected inspect output for {} {}: {}", kind, name, e))
        }
        other => other,
    })
}

/// Decode the first element of an inspect JSON array
pub fn decode_first<T: DeserializeOwned>(text: &str) -> Result<T> {
    let mut items: Vec<serde_json::Value> = serde_json::from_str(text)?;
    if items.is_empty() {
        return Err(StackError::NotFound("empty inspect result".to_string()));
    }
    Ok(serde_json::from_value(items.swap_remove(0))?)
}
