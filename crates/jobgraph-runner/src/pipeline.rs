use crate::io::{load_job_override, load_workflow_definitions};
use crate::render::render_issue_lines;
use jobgraph_core::{has_errors, StructuredIssue};
use jobgraph_sdk::{
    build_job_descriptor, compile_workflow, discover_job_artifacts, resolve_job_config,
    CompileWorkflowOptions, CompileWorkflowResult, DefaultTemplates, DiscoveryOptions, JobArtifact,
    JobBuildInput, JobConfig, JobReferences, ProvisioningBackend, ResolvedJobConfig, RoleSpec,
    ScratchBucket, WorkflowDefinition, WorkflowDescriptor,
};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct SynthesisInput<'a> {
    pub jobs_dir: &'a Path,
    pub workflows_dir: &'a Path,
    pub templates: &'a DefaultTemplates,
    pub discovery: &'a DiscoveryOptions,
    pub compile: &'a CompileWorkflowOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisSummary {
    pub jobs: Vec<String>,
    pub scratch_bucket: ScratchBucket,
    pub workflows: Vec<String>,
    pub trigger_count: usize,
    pub issues: Vec<StructuredIssue>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(
        "synthesis failed with {} error(s):\n{}",
        .0.iter().filter(|issue| issue.is_error()).count(),
        render_issue_lines(.0)
    )]
    Issues(Vec<StructuredIssue>),
    #[error("provisioning backend failed to {operation}: {reason}")]
    Backend { operation: String, reason: String },
}

struct PreparedJob {
    artifact: JobArtifact,
    resolved: ResolvedJobConfig,
}

/// Runs discovery, resolution, descriptor building and workflow compilation
/// against `backend`. Every document is checked before the backend creates a
/// job, so a run with any error issue leaves the backend untouched.
pub fn synthesize<B: ProvisioningBackend>(
    input: &SynthesisInput<'_>,
    backend: &mut B,
) -> Result<SynthesisSummary, PipelineError> {
    let artifacts =
        discover_job_artifacts(input.jobs_dir, input.discovery).map_err(PipelineError::Issues)?;
    info!(count = artifacts.len(), root = %input.jobs_dir.display(), "discovered job artifacts");

    // Workflows are checked against every discovered job, including jobs
    // whose override failed to load, so only the override error is reported.
    let discovered = artifacts
        .iter()
        .map(|artifact| (artifact.name.as_str(), artifact.name.as_str()))
        .collect::<JobReferences>();
    let mut issues = Vec::new();
    let prepared = prepare_jobs(artifacts, input.templates, &mut issues);
    let loaded = load_workflow_definitions(input.workflows_dir);
    issues.extend(loaded.issues);
    preflight_workflows(&loaded.definitions, &discovered, input.compile, &mut issues);
    if has_errors(&issues) {
        StructuredIssue::sort_stable(&mut issues);
        return Err(PipelineError::Issues(issues));
    }

    let role_reference = backend
        .create_role(&RoleSpec::glue_job_role())
        .map_err(|reason| backend_error("create the job role", reason))?;
    let scratch_bucket = backend
        .create_scratch_bucket()
        .map_err(|reason| backend_error("create the scratch bucket", reason))?;
    info!(bucket = %scratch_bucket.name, "created scratch bucket");

    let mut references = JobReferences::new();
    let mut jobs = Vec::with_capacity(prepared.len());
    for PreparedJob { artifact, resolved } in prepared {
        let script_location = backend
            .upload_artifact(&artifact.path)
            .map_err(|reason| backend_error(&format!("upload `{}`", artifact.name), reason))?;
        let resolved = resolved.with_script_location(script_location.as_str());
        let build = build_job_descriptor(&JobBuildInput {
            name: artifact.name.as_str(),
            resolved: &resolved,
            script_location_uri: script_location.as_str(),
            role_reference: role_reference.as_str(),
            group_label: artifact.group_label.as_str(),
            scratch_location: scratch_bucket.scratch_location.as_str(),
        });
        issues.extend(build.issues);
        let created = backend
            .create_job(&build.descriptor)
            .map_err(|reason| backend_error(&format!("create job `{}`", artifact.name), reason))?;
        references.insert(artifact.name.as_str(), created.stable_name.as_str());
        jobs.push(created.stable_name);
    }

    let mut workflows = Vec::with_capacity(loaded.definitions.len());
    let mut trigger_count = 0;
    for definition in &loaded.definitions {
        let workflow = match compile_workflow(definition, &references, input.compile) {
            CompileWorkflowResult::Ok { workflow, warnings } => {
                issues.extend(warnings);
                workflow
            }
            CompileWorkflowResult::Err { issues: compile_issues } => {
                issues.extend(compile_issues);
                StructuredIssue::sort_stable(&mut issues);
                return Err(PipelineError::Issues(issues));
            }
        };
        trigger_count += create_workflow(backend, &workflow)?;
        workflows.push(workflow.name);
    }

    StructuredIssue::sort_stable(&mut issues);
    for issue in &issues {
        warn!("{issue}");
    }
    Ok(SynthesisSummary {
        jobs,
        scratch_bucket,
        workflows,
        trigger_count,
        issues,
    })
}

fn prepare_jobs(
    artifacts: Vec<JobArtifact>,
    templates: &DefaultTemplates,
    issues: &mut Vec<StructuredIssue>,
) -> Vec<PreparedJob> {
    let mut prepared = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let overrides = match &artifact.override_config_path {
            Some(path) => match load_job_override(artifact.name.as_str(), path) {
                Ok(overrides) => overrides,
                Err(override_issues) => {
                    issues.extend(override_issues);
                    continue;
                }
            },
            None => JobConfig::default(),
        };
        let resolved = resolve_job_config(&overrides, templates);
        debug!(job = %artifact.name, job_type = resolved.job_type.as_str(), "resolved job configuration");
        prepared.push(PreparedJob { artifact, resolved });
    }
    prepared
}

fn preflight_workflows(
    definitions: &[WorkflowDefinition],
    known: &JobReferences,
    options: &CompileWorkflowOptions,
    issues: &mut Vec<StructuredIssue>,
) {
    for definition in definitions {
        if let CompileWorkflowResult::Err { issues: compile_issues } =
            compile_workflow(definition, known, options)
        {
            issues.extend(compile_issues);
        }
    }
}

fn create_workflow<B: ProvisioningBackend>(
    backend: &mut B,
    workflow: &WorkflowDescriptor,
) -> Result<usize, PipelineError> {
    backend
        .create_workflow(workflow.name.as_str(), workflow.description.as_str())
        .map_err(|reason| backend_error(&format!("create workflow `{}`", workflow.name), reason))?;
    for trigger in &workflow.triggers {
        backend.create_trigger(trigger).map_err(|reason| {
            backend_error(
                &format!("create trigger `{}` of workflow `{}`", trigger.name, workflow.name),
                reason,
            )
        })?;
    }
    Ok(workflow.triggers.len())
}

fn backend_error(operation: &str, reason: String) -> PipelineError {
    PipelineError::Backend {
        operation: operation.to_string(),
        reason,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
