use serde_json::{Map, Value};

/// Overlays `overlay` onto `base` and returns the result; neither input is
/// modified. Objects merge key by key, recursively. Any other value kind in
/// the overlay (scalars, arrays, null) replaces the base value wholesale.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => Value::Object(deep_merge_maps(base, overlay)),
        (_, overlay) => overlay.clone(),
    }
}

pub fn deep_merge_maps(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        let next = match merged.get(key) {
            Some(existing) => deep_merge(existing, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
