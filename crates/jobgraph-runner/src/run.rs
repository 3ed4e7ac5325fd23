use crate::cli::{DiscoverCommand, OutputFormat, SourceArgs, SynthCommand, ValidateCommand};
use crate::config::{load_runner_config, ResolvedPaths, RunnerConfig, RunnerConfigError};
use crate::io::{load_default_templates, TemplateError};
use crate::pipeline::{synthesize, PipelineError, SynthesisInput, SynthesisSummary};
use crate::render::render_issue_lines;
use jobgraph_core::StructuredIssue;
use jobgraph_sdk::{discover_job_artifacts, DeploymentManifest, ManifestBackend};
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] RunnerConfigError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("job discovery failed:\n{}", render_issue_lines(.0))]
    Discovery(Vec<StructuredIssue>),
    #[error("current directory unavailable: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("manifest build failed: {0}")]
    Manifest(String),
    #[error("write file failed `{path}`: {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("json encode failed: {0}")]
    Json(#[from] serde_json::Error),
}

struct RunContext {
    config: RunnerConfig,
    paths: ResolvedPaths,
}

fn load_context(source: &SourceArgs) -> Result<RunContext, RunnerError> {
    let config = match &source.config {
        Some(path) => load_runner_config(path)?,
        None => RunnerConfig::default(),
    };
    let base = match (&source.root, &source.config) {
        (Some(root), _) => root.clone(),
        (None, Some(config_path)) => config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
        (None, None) => std::env::current_dir().map_err(RunnerError::CurrentDir)?,
    };
    let paths = config.resolve_paths(base.as_path());
    Ok(RunContext { config, paths })
}

struct Synthesis {
    summary: SynthesisSummary,
    manifest: DeploymentManifest,
}

fn run_synthesis(context: &RunContext) -> Result<Synthesis, RunnerError> {
    let templates = load_default_templates(&context.paths.templates_dir)?;
    let discovery = context.config.discovery_options();
    let compile = context.config.compile_options();
    let mut backend = ManifestBackend::new(context.config.backend_options());
    let summary = synthesize(
        &SynthesisInput {
            jobs_dir: &context.paths.jobs_dir,
            workflows_dir: &context.paths.workflows_dir,
            templates: &templates,
            discovery: &discovery,
            compile: &compile,
        },
        &mut backend,
    )?;
    let manifest = backend.manifest().map_err(RunnerError::Manifest)?;
    Ok(Synthesis { summary, manifest })
}

pub fn execute_synth(command: &SynthCommand) -> Result<String, RunnerError> {
    let context = load_context(&command.source)?;
    let synthesis = run_synthesis(&context)?;

    if let Some(out) = &command.out {
        write_manifest(out, &synthesis.manifest)?;
        info!(path = %out.display(), fingerprint = %synthesis.manifest.fingerprint, "wrote deployment manifest");
    }
    render_summary("synth", &synthesis, command.out.as_deref(), &command.format)
}

pub fn execute_validate(command: &ValidateCommand) -> Result<String, RunnerError> {
    let context = load_context(&command.source)?;
    let synthesis = run_synthesis(&context)?;
    render_summary("validate", &synthesis, None, &command.format)
}

pub fn execute_discover(command: &DiscoverCommand) -> Result<String, RunnerError> {
    let context = load_context(&command.source)?;
    let artifacts = discover_job_artifacts(&context.paths.jobs_dir, &context.config.discovery_options())
        .map_err(RunnerError::Discovery)?;

    let output = match command.format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "schema": "jobgraph-runner-discover/0.0.1",
            "root": context.paths.jobs_dir.display().to_string(),
            "artifacts": artifacts,
        }))?,
        OutputFormat::Text => {
            let mut lines = vec![format!(
                "jobgraph discover\nroot: {}\nartifacts: {}",
                context.paths.jobs_dir.display(),
                artifacts.len()
            )];
            for artifact in &artifacts {
                let override_label = artifact
                    .override_config_path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "none".to_string());
                lines.push(format!(
                    "- {} (group: {}, override: {})",
                    artifact.name, artifact.group_label, override_label
                ));
            }
            lines.join("\n")
        }
    };
    Ok(output)
}

fn write_manifest(path: &Path, manifest: &DeploymentManifest) -> Result<(), RunnerError> {
    let payload = serde_json::to_string_pretty(manifest)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| RunnerError::WriteFile {
            path: parent.display().to_string(),
            source,
        })?;
    }
    fs::write(path, format!("{payload}\n")).map_err(|source| RunnerError::WriteFile {
        path: path.display().to_string(),
        source,
    })
}

fn render_summary(
    command: &str,
    synthesis: &Synthesis,
    manifest_path: Option<&Path>,
    format: &OutputFormat,
) -> Result<String, RunnerError> {
    let summary = &synthesis.summary;
    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "schema": format!("jobgraph-runner-{command}/0.0.1"),
            "jobs": summary.jobs,
            "scratch_bucket": summary.scratch_bucket,
            "workflows": summary.workflows,
            "trigger_count": summary.trigger_count,
            "issues": summary.issues,
            "fingerprint": synthesis.manifest.fingerprint,
            "manifest": manifest_path.map(|path| path.display().to_string()),
        }))?,
        OutputFormat::Text => {
            let mut text = format!(
                "jobgraph {command}\njobs: {}\nscratch_bucket: {} ({})\nworkflows: {}\ntriggers: {}\nfingerprint: {}",
                join_or_none(&summary.jobs),
                summary.scratch_bucket.name,
                summary.scratch_bucket.reference,
                join_or_none(&summary.workflows),
                summary.trigger_count,
                synthesis.manifest.fingerprint,
            );
            if let Some(path) = manifest_path {
                text.push_str(&format!("\nmanifest: {}", path.display()));
            }
            if !summary.issues.is_empty() {
                text.push_str(&format!(
                    "\nissues: {}\n{}",
                    summary.issues.len(),
                    render_issue_lines(&summary.issues)
                ));
            }
            text
        }
    };
    Ok(output)
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(",")
    }
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
