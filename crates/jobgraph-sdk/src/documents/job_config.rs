use jobgraph_core::deep_merge_maps;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    #[default]
    Python,
    Spark,
}

impl JobType {
    pub fn from_declared(declared: Option<&str>) -> Self {
        match declared {
            Some("spark") => JobType::Spark,
            _ => JobType::Python,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobType::Python => "python",
            JobType::Spark => "spark",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "JobConfigLayer")]
pub struct JobConfig {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glue_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_workers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_location: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub default_arguments: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Scalar keys written as `null`. They unset the inherited value.
    #[serde(skip)]
    pub cleared: BTreeSet<&'static str>,
}

impl JobConfig {
    /// Returns `overrides` layered on top of `self`. Neither side is modified.
    pub fn overlay(&self, overrides: &JobConfig) -> JobConfig {
        JobConfig {
            job_type: overrides.layer("type", &self.job_type, &overrides.job_type),
            glue_version: overrides.layer("glue_version", &self.glue_version, &overrides.glue_version),
            timeout_minutes: overrides.layer(
                "timeout_minutes",
                &self.timeout_minutes,
                &overrides.timeout_minutes,
            ),
            max_retries: overrides.layer("max_retries", &self.max_retries, &overrides.max_retries),
            worker_type: overrides.layer("worker_type", &self.worker_type, &overrides.worker_type),
            number_of_workers: overrides.layer(
                "number_of_workers",
                &self.number_of_workers,
                &overrides.number_of_workers,
            ),
            python_version: overrides.layer(
                "python_version",
                &self.python_version,
                &overrides.python_version,
            ),
            script_location: overrides.layer(
                "script_location",
                &self.script_location,
                &overrides.script_location,
            ),
            default_arguments: deep_merge_maps(&self.default_arguments, &overrides.default_arguments),
            extra: deep_merge_maps(&self.extra, &overrides.extra),
            cleared: BTreeSet::new(),
        }
    }

    pub fn declared_type(&self) -> JobType {
        JobType::from_declared(self.job_type.as_deref())
    }

    fn layer<T: Clone>(&self, key: &str, base: &Option<T>, overrides: &Option<T>) -> Option<T> {
        if self.cleared.contains(key) {
            return None;
        }
        overrides.as_ref().or(base.as_ref()).cloned()
    }
}

#[derive(Deserialize)]
struct JobConfigLayer {
    #[serde(default, rename = "type", deserialize_with = "nullable")]
    job_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    glue_version: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    timeout_minutes: Option<Option<u32>>,
    #[serde(default, deserialize_with = "nullable")]
    max_retries: Option<Option<u32>>,
    #[serde(default, deserialize_with = "nullable")]
    worker_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    number_of_workers: Option<Option<u32>>,
    #[serde(default, deserialize_with = "nullable")]
    python_version: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    script_location: Option<Option<String>>,
    #[serde(default)]
    default_arguments: Map<String, Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

// Present-but-null deserializes to `Some(None)`; an absent key stays `None`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<JobConfigLayer> for JobConfig {
    fn from(layer: JobConfigLayer) -> Self {
        let mut cleared = BTreeSet::new();
        JobConfig {
            job_type: settle(&mut cleared, "type", layer.job_type),
            glue_version: settle(&mut cleared, "glue_version", layer.glue_version),
            timeout_minutes: settle(&mut cleared, "timeout_minutes", layer.timeout_minutes),
            max_retries: settle(&mut cleared, "max_retries", layer.max_retries),
            worker_type: settle(&mut cleared, "worker_type", layer.worker_type),
            number_of_workers: settle(&mut cleared, "number_of_workers", layer.number_of_workers),
            python_version: settle(&mut cleared, "python_version", layer.python_version),
            script_location: settle(&mut cleared, "script_location", layer.script_location),
            default_arguments: layer.default_arguments,
            extra: layer.extra,
            cleared,
        }
    }
}

fn settle<T>(cleared: &mut BTreeSet<&'static str>, key: &'static str, value: Option<Option<T>>) -> Option<T> {
    match value {
        Some(None) => {
            cleared.insert(key);
            None
        }
        other => other.flatten(),
    }
}

#[cfg(test)]
#[path = "job_config_test.rs"]
mod tests;
