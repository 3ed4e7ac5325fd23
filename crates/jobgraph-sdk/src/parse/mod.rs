mod json;

use crate::documents::{JobConfig, WorkflowDefinition};
use jobgraph_core::{FieldPath, StructuredIssue};
use jobgraph_schema::validate_schema_instance;
use jobgraph_schema::versions::{SCHEMA_JOB_CONFIG_0_0_1, SCHEMA_WORKFLOW_0_0_1};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use json::parse_json;

pub fn parse_job_config(input: &str) -> Result<JobConfig, Vec<StructuredIssue>> {
    let value = parse_json(input)?;
    parse_typed_document(value, SCHEMA_JOB_CONFIG_0_0_1)
}

pub fn parse_workflow_definition(
    name: &str,
    input: &str,
) -> Result<WorkflowDefinition, Vec<StructuredIssue>> {
    let value = parse_json(input)?;
    let mut definition: WorkflowDefinition = parse_typed_document(value, SCHEMA_WORKFLOW_0_0_1)
        .map_err(|issues| {
            issues
                .into_iter()
                .map(|issue| issue.with_subject(name))
                .collect::<Vec<_>>()
        })?;
    definition.name = name.to_string();
    Ok(definition)
}

fn parse_typed_document<T: DeserializeOwned>(
    value: Value,
    schema_id: &str,
) -> Result<T, Vec<StructuredIssue>> {
    let mut issues = validate_schema_instance(schema_id, &value);
    if !issues.is_empty() {
        StructuredIssue::sort_stable(&mut issues);
        return Err(issues);
    }

    serde_json::from_value::<T>(value).map_err(|err| {
        vec![StructuredIssue::error(
            "parse_error",
            FieldPath::root(),
            format!("typed parse failed for schema {schema_id}: {err}"),
            "parse.typed_deserialize_error",
        )]
    })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
