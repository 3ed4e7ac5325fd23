use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct FingerprintOptions {
    pub ignore_object_keys: BTreeSet<String>,
}

pub fn canonical_json_bytes(value: &Value, options: &FingerprintOptions) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&canonicalize(value, options))
}

pub fn fingerprint_hex(value: &Value, options: &FingerprintOptions) -> serde_json::Result<String> {
    let bytes = canonical_json_bytes(value, options)?;
    Ok(format!("{:x}", Sha256::digest(bytes)))
}

fn canonicalize(value: &Value, options: &FingerprintOptions) -> Value {
    match value {
        Value::Object(object) => {
            let mut keys = object
                .keys()
                .filter(|key| !options.ignore_object_keys.contains(*key))
                .collect::<Vec<_>>();
            keys.sort();
            let mut out = Map::new();
            for key in keys {
                out.insert(key.clone(), canonicalize(&object[key], options));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(|item| canonicalize(item, options)).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
#[path = "fingerprint_test.rs"]
mod tests;
