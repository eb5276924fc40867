//! # Record Documents
//!
//! Reads record files from disk. Records are JSON; hand-drafted records
//! may also be written in YAML (`.yaml` / `.yml`) and are converted to the
//! JSON value model before validation.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Read a record file as a JSON value, converting YAML by extension.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match extension {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse YAML in {}", path.display()))?;
            yaml_to_json(&yaml).with_context(|| format!("failed to convert {} to JSON", path.display()))
        }
        _ => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON in {}", path.display())),
    }
}

/// Convert a YAML value to JSON. Tags are dropped; scalar map keys become strings.
pub fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else if let Some(f) = n.as_f64() {
                match serde_json::Number::from_f64(f) {
                    Some(number) => Value::Number(number),
                    None => bail!("cannot represent {f} in JSON"),
                }
            } else {
                bail!("unsupported YAML number: {n:?}")
            }
        }
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.iter().map(yaml_to_json).collect::<Result<_>>()?)
        }
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => bail!("unsupported YAML map key: {other:?}"),
                };
                object.insert(key, yaml_to_json(v)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value)?,
    })
}
