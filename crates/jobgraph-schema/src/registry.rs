use crate::versions::{SCHEMA_JOB_CONFIG_0_0_1, SCHEMA_WORKFLOW_0_0_1};

const JOB_CONFIG_SCHEMA: &str = include_str!("../schemas/job-config.schema.json");
const WORKFLOW_SCHEMA: &str = include_str!("../schemas/workflow.schema.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedSchema {
    pub id: &'static str,
    pub json: &'static str,
}

pub fn get_json_schema(schema_id: &str) -> Option<EmbeddedSchema> {
    match schema_id {
        SCHEMA_JOB_CONFIG_0_0_1 => Some(EmbeddedSchema {
            id: SCHEMA_JOB_CONFIG_0_0_1,
            json: JOB_CONFIG_SCHEMA,
        }),
        SCHEMA_WORKFLOW_0_0_1 => Some(EmbeddedSchema {
            id: SCHEMA_WORKFLOW_0_0_1,
            json: WORKFLOW_SCHEMA,
        }),
        _ => None,
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
