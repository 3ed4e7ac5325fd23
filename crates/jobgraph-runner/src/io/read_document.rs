use jobgraph_core::{FieldPath, StructuredIssue};
use jobgraph_sdk::{
    parse_job_config, parse_workflow_definition, DefaultTemplates, JobConfig, WorkflowDefinition,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PYTHON_TEMPLATE_FILE: &str = "default_python_job_config.json";
pub const SPARK_TEMPLATE_FILE: &str = "default_spark_job_config.json";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("default template missing `{path}`")]
    Missing { path: String },
    #[error("read default template failed `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("default template invalid `{path}`:\n{}", crate::render::render_issue_lines(.issues))]
    Invalid {
        path: String,
        issues: Vec<StructuredIssue>,
    },
}

pub fn load_default_templates(templates_dir: &Path) -> Result<DefaultTemplates, TemplateError> {
    let python = load_template(&templates_dir.join(PYTHON_TEMPLATE_FILE))?;
    let spark = load_template(&templates_dir.join(SPARK_TEMPLATE_FILE))?;
    Ok(DefaultTemplates::new(python, spark))
}

fn load_template(path: &Path) -> Result<JobConfig, TemplateError> {
    if !path.is_file() {
        return Err(TemplateError::Missing {
            path: path.display().to_string(),
        });
    }
    let text = fs::read_to_string(path).map_err(|source| TemplateError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    parse_job_config(text.as_str()).map_err(|issues| TemplateError::Invalid {
        path: path.display().to_string(),
        issues: issues.into_iter().map(|issue| issue.with_file(path)).collect(),
    })
}

pub fn load_job_override(job_name: &str, path: &Path) -> Result<JobConfig, Vec<StructuredIssue>> {
    let text = fs::read_to_string(path).map_err(|error| {
        vec![StructuredIssue::error(
            "io_error",
            FieldPath::root(),
            format!("read file failed: {error}"),
            "runner.override.read_file_failed",
        )
        .with_subject(job_name)
        .with_file(path)]
    })?;
    parse_job_config(text.as_str()).map_err(|issues| {
        issues
            .into_iter()
            .map(|issue| issue.with_subject(job_name).with_file(path))
            .collect()
    })
}

#[derive(Debug, Clone, Default)]
pub struct LoadedWorkflows {
    pub definitions: Vec<WorkflowDefinition>,
    pub issues: Vec<StructuredIssue>,
}

pub fn load_workflow_definitions(workflows_dir: &Path) -> LoadedWorkflows {
    let mut loaded = LoadedWorkflows::default();
    if !workflows_dir.exists() {
        debug!(dir = %workflows_dir.display(), "workflows directory does not exist");
        return loaded;
    }

    let paths = match workflow_files(workflows_dir) {
        Ok(paths) => paths,
        Err(error) => {
            loaded.issues.push(
                StructuredIssue::error(
                    "io_error",
                    FieldPath::root(),
                    format!("read_dir failed: {error}"),
                    "runner.workflows.read_dir_failed",
                )
                .with_file(workflows_dir),
            );
            return loaded;
        }
    };

    for path in paths {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) => {
                loaded.issues.push(
                    StructuredIssue::error(
                        "io_error",
                        FieldPath::root(),
                        format!("read file failed: {error}"),
                        "runner.workflows.read_file_failed",
                    )
                    .with_subject(name.as_str())
                    .with_file(path.as_path()),
                );
                continue;
            }
        };
        match parse_workflow_definition(name.as_str(), text.as_str()) {
            Ok(definition) => {
                debug!(workflow = %definition.name, triggers = definition.triggers.len(), "loaded workflow definition");
                loaded.definitions.push(definition);
            }
            Err(issues) => loaded
                .issues
                .extend(issues.into_iter().map(|issue| issue.with_file(path.as_path()))),
        }
    }

    StructuredIssue::sort_stable(&mut loaded.issues);
    loaded
}

fn workflow_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
#[path = "read_document_test.rs"]
mod tests;
