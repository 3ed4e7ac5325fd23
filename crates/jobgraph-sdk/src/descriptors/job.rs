use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobEngine {
    #[serde(rename = "glueetl")]
    Bulk,
    #[serde(rename = "pythonshell")]
    ScriptRunner,
}

impl JobEngine {
    pub fn as_str(self) -> &'static str {
        match self {
            JobEngine::Bulk => "glueetl",
            JobEngine::ScriptRunner => "pythonshell",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobCommand {
    pub name: JobEngine,
    pub script_location: String,
    pub python_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobDescriptor {
    #[serde(skip)]
    pub logical_id: String,
    pub name: String,
    pub role: String,
    pub command: JobCommand,
    pub default_arguments: Map<String, Value>,
    pub glue_version: String,
    pub max_retries: u32,
    #[serde(rename = "Timeout")]
    pub timeout_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_workers: Option<u32>,
    pub tags: BTreeMap<String, String>,
}
