use crate::descriptors::{JobCommand, JobDescriptor, JobEngine};
use crate::documents::JobType;
use crate::resolve::ResolvedJobConfig;
use jobgraph_core::{normalize_identifier, FieldPath, StructuredIssue};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const SCRATCH_ARGUMENT_KEY: &str = "--TempDir";
pub const GROUP_TAG_KEY: &str = "JobFolder";
pub const DEFAULT_GLUE_VERSION: &str = "3.0";
pub const DEFAULT_PYTHON_VERSION: &str = "3.10";
pub const DEFAULT_TIMEOUT_MINUTES: u32 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 2;

#[derive(Debug, Clone, Copy)]
pub struct JobBuildInput<'a> {
    pub name: &'a str,
    pub resolved: &'a ResolvedJobConfig,
    pub script_location_uri: &'a str,
    pub role_reference: &'a str,
    pub group_label: &'a str,
    pub scratch_location: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobBuild {
    pub descriptor: JobDescriptor,
    pub issues: Vec<StructuredIssue>,
}

pub fn job_logical_id(job_name: &str) -> String {
    format!("GlueJob{}", normalize_identifier(job_name))
}

pub fn build_job_descriptor(input: &JobBuildInput<'_>) -> JobBuild {
    let config = &input.resolved.config;
    let mut issues = Vec::new();

    let mut default_arguments = config.default_arguments.clone();
    let previous = default_arguments.insert(
        SCRATCH_ARGUMENT_KEY.to_string(),
        Value::String(input.scratch_location.to_string()),
    );
    if let Some(previous) = previous {
        issues.push(
            StructuredIssue::warning(
                "job_warning",
                FieldPath::key("default_arguments").with_key(SCRATCH_ARGUMENT_KEY),
                format!("`{SCRATCH_ARGUMENT_KEY}` is reserved and was replaced by the scratch location"),
                "job.scratch_argument_overridden",
            )
            .with_subject(input.name)
            .with_related(json!({ "ignored": previous })),
        );
    }

    if config.worker_type.is_some() != config.number_of_workers.is_some() {
        let (present, missing) = if config.worker_type.is_some() {
            ("worker_type", "number_of_workers")
        } else {
            ("number_of_workers", "worker_type")
        };
        issues.push(
            StructuredIssue::warning(
                "job_warning",
                FieldPath::key(missing),
                format!("`{present}` is set without `{missing}`; backends usually expect both or neither"),
                "job.worker_fields_uncoupled",
            )
            .with_subject(input.name),
        );
    }

    let engine = match config.declared_type() {
        JobType::Spark => JobEngine::Bulk,
        JobType::Python => JobEngine::ScriptRunner,
    };

    let descriptor = JobDescriptor {
        logical_id: job_logical_id(input.name),
        name: input.name.to_string(),
        role: input.role_reference.to_string(),
        command: JobCommand {
            name: engine,
            script_location: input.script_location_uri.to_string(),
            python_version: config
                .python_version
                .clone()
                .unwrap_or_else(|| DEFAULT_PYTHON_VERSION.to_string()),
        },
        default_arguments,
        glue_version: config
            .glue_version
            .clone()
            .unwrap_or_else(|| DEFAULT_GLUE_VERSION.to_string()),
        max_retries: config.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        timeout_minutes: config.timeout_minutes.unwrap_or(DEFAULT_TIMEOUT_MINUTES),
        worker_type: config.worker_type.clone(),
        number_of_workers: config.number_of_workers,
        tags: BTreeMap::from([(GROUP_TAG_KEY.to_string(), input.group_label.to_string())]),
    };

    JobBuild { descriptor, issues }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
