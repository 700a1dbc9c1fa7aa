use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Directory the external generator owns, discovered relative to the
/// workspace root.
pub const DATA_DIR: &str = ".planpulse";
pub const STATE_FILE: &str = "state.json";
pub const PLAN_FILE: &str = "plan_overview.md";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The externally-owned workspace state. The cockpit only ever reads it;
/// pulse-sim writes it on behalf of the generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceState {
    #[serde(default, deserialize_with = "deserialize_records")]
    pub syllabi: Vec<ArtifactRecord>,
    #[serde(default, deserialize_with = "deserialize_records")]
    pub tests: Vec<ArtifactRecord>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub plans_generated: u64,
    #[serde(default, flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size_kb: f64,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
    #[serde(default, flatten)]
    pub extra: HashMap<String, Value>,
}

impl ArtifactRecord {
    pub fn named(name: impl Into<String>, size_kb: f64, added_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            size_kb,
            added_at: Some(added_at),
            extra: HashMap::new(),
        }
    }
}

/// An immutable read of the three counters at one instant. Produced fresh
/// on every poll, never mutated in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    pub syllabi: usize,
    pub tests: usize,
    pub plans_generated: u64,
}

impl StateSnapshot {
    pub fn of(state: &WorkspaceState) -> Self {
        Self {
            syllabi: state.syllabi.len(),
            tests: state.tests.len(),
            plans_generated: state.plans_generated,
        }
    }
}

pub fn load_state(path: &Path) -> Result<WorkspaceState, StateError> {
    let content = std::fs::read_to_string(path).map_err(|source| StateError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StateError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn save_state(path: &Path, state: &WorkspaceState) -> Result<(), StateError> {
    let content = serde_json::to_string_pretty(state).map_err(|source| StateError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    std::fs::write(path, content).map_err(|source| StateError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Deserialize an artifact list that may be malformed. Anything that is not
/// an array coerces to empty; bare strings become name-only records.
fn deserialize_records<'de, D>(deserializer: D) -> Result<Vec<ArtifactRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let val = Value::deserialize(deserializer)?;
    let Value::Array(items) = val else {
        return Ok(Vec::new());
    };
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(name) => records.push(ArtifactRecord {
                name,
                ..Default::default()
            }),
            Value::Object(_) => {
                if let Ok(record) = serde_json::from_value::<ArtifactRecord>(item) {
                    records.push(record);
                }
            }
            _ => {}
        }
    }
    Ok(records)
}

/// Deserialize a counter that may be a number, a numeric string, or junk
/// (junk and negatives coerce to zero).
fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let val = Value::deserialize(deserializer)?;
    Ok(match val {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    })
}
