use jobgraph_core::{FieldPath, StructuredIssue};
use jobgraph_sdk::{
    CompileWorkflowOptions, DiscoveryOptions, ManifestBackendOptions, UnresolvedReferencePolicy,
    DEFAULT_ARTIFACT_SUFFIX, DEFAULT_OVERRIDE_FILE, DEFAULT_SCHEDULE,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const RUNNER_CONFIG_SCHEMA_0_0_1: &str = "jobgraph-runner/0.0.1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    pub schema: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub compile: CompileConfig,
    #[serde(default)]
    pub stack: StackConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            schema: RUNNER_CONFIG_SCHEMA_0_0_1.to_string(),
            paths: PathsConfig::default(),
            discovery: DiscoveryConfig::default(),
            compile: CompileConfig::default(),
            stack: StackConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub jobs_dir: PathBuf,
    pub workflows_dir: PathBuf,
    pub templates_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            jobs_dir: PathBuf::from("jobs"),
            workflows_dir: PathBuf::from("workflows"),
            templates_dir: PathBuf::from("config/jobs/base"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub artifact_suffix: String,
    pub override_file: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            artifact_suffix: DEFAULT_ARTIFACT_SUFFIX.to_string(),
            override_file: DEFAULT_OVERRIDE_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    pub unresolved_references: UnresolvedReferencePolicy,
    pub default_schedule: String,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            unresolved_references: UnresolvedReferencePolicy::Fail,
            default_schedule: DEFAULT_SCHEDULE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackConfig {
    pub name: String,
    pub account: Option<String>,
    pub region: String,
    pub assets_bucket: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            name: "GlueJobsStack".to_string(),
            account: None,
            region: "us-west-2".to_string(),
            assets_bucket: "jobgraph-assets".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub jobs_dir: PathBuf,
    pub workflows_dir: PathBuf,
    pub templates_dir: PathBuf,
}

impl RunnerConfig {
    pub fn resolve_paths(&self, base: &Path) -> ResolvedPaths {
        ResolvedPaths {
            jobs_dir: base.join(&self.paths.jobs_dir),
            workflows_dir: base.join(&self.paths.workflows_dir),
            templates_dir: base.join(&self.paths.templates_dir),
        }
    }

    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            artifact_suffix: self.discovery.artifact_suffix.clone(),
            override_file: self.discovery.override_file.clone(),
        }
    }

    pub fn compile_options(&self) -> CompileWorkflowOptions {
        CompileWorkflowOptions {
            unresolved_references: self.compile.unresolved_references,
            default_schedule: self.compile.default_schedule.clone(),
        }
    }

    pub fn backend_options(&self) -> ManifestBackendOptions {
        ManifestBackendOptions {
            stack_name: self.stack.name.clone(),
            account: self.stack.account.clone().filter(|account| !account.is_empty()),
            region: self.stack.region.clone(),
            assets_bucket: self.stack.assets_bucket.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerConfigError {
    #[error("read runner config failed `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("runner config parse failed: {0}")]
    Parse(String),
    #[error("runner config validation failed:\n{}", crate::render::render_issue_lines(.0))]
    Validation(Vec<StructuredIssue>),
}

pub fn load_runner_config(path: &Path) -> Result<RunnerConfig, RunnerConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| RunnerConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    let expanded = expand_env_placeholders(raw.as_str()).map_err(RunnerConfigError::Parse)?;
    let config: RunnerConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(expanded.as_str()).map_err(|error| {
            RunnerConfigError::Parse(format!("json decode error: {error}"))
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(expanded.as_str()).map_err(|error| {
            RunnerConfigError::Parse(format!("yaml decode error: {error}"))
        })?,
        _ => serde_yaml::from_str(expanded.as_str())
            .or_else(|_| serde_json::from_str(expanded.as_str()))
            .map_err(|error| RunnerConfigError::Parse(error.to_string()))?,
    };

    let mut issues = validate_runner_config(&config);
    StructuredIssue::sort_stable(&mut issues);
    if !issues.is_empty() {
        return Err(RunnerConfigError::Validation(issues));
    }
    Ok(config)
}

pub fn validate_runner_config(config: &RunnerConfig) -> Vec<StructuredIssue> {
    let mut issues = Vec::<StructuredIssue>::new();
    if config.schema != RUNNER_CONFIG_SCHEMA_0_0_1 {
        issues.push(config_issue(
            "runner.config.schema",
            FieldPath::key("schema"),
            format!(
                "unsupported runner config schema `{}` (expected `{RUNNER_CONFIG_SCHEMA_0_0_1}`)",
                config.schema
            ),
        ));
    }

    let suffix = config.discovery.artifact_suffix.as_str();
    if suffix.is_empty() {
        issues.push(config_issue(
            "runner.config.discovery.artifact_suffix",
            FieldPath::key("discovery").with_key("artifact_suffix"),
            "artifact_suffix must not be empty".to_string(),
        ));
    }
    let override_file = config.discovery.override_file.as_str();
    if override_file.is_empty() || override_file.contains(&['/', '\\'][..]) {
        issues.push(config_issue(
            "runner.config.discovery.override_file",
            FieldPath::key("discovery").with_key("override_file"),
            "override_file must be a plain, non-empty file name".to_string(),
        ));
    } else if !suffix.is_empty() && override_file.ends_with(suffix) {
        issues.push(config_issue(
            "runner.config.discovery.override_file_collision",
            FieldPath::key("discovery").with_key("override_file"),
            format!("override_file `{override_file}` would itself be discovered as a job artifact"),
        ));
    }

    if config.compile.default_schedule.trim().is_empty() {
        issues.push(config_issue(
            "runner.config.compile.default_schedule",
            FieldPath::key("compile").with_key("default_schedule"),
            "default_schedule must not be empty".to_string(),
        ));
    }

    if config.stack.name.trim().is_empty() {
        issues.push(config_issue(
            "runner.config.stack.name",
            FieldPath::key("stack").with_key("name"),
            "stack name must not be empty".to_string(),
        ));
    }
    let region_pattern = Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d+$").expect("valid regex");
    if !region_pattern.is_match(config.stack.region.as_str()) {
        issues.push(config_issue(
            "runner.config.stack.region",
            FieldPath::key("stack").with_key("region"),
            format!("region `{}` is not a valid region name", config.stack.region),
        ));
    }
    if config.stack.assets_bucket.trim().is_empty() {
        issues.push(config_issue(
            "runner.config.stack.assets_bucket",
            FieldPath::key("stack").with_key("assets_bucket"),
            "assets_bucket must not be empty".to_string(),
        ));
    }

    issues
}

fn config_issue(reference: &str, path: FieldPath, message: String) -> StructuredIssue {
    StructuredIssue::error("runner_config_error", path, message, reference)
}

fn expand_env_placeholders(input: &str) -> Result<String, String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let end = after_open
            .find('}')
            .ok_or_else(|| "unterminated env placeholder `${...`".to_string())?;
        let placeholder = &after_open[..end];
        let (key, fallback) = match placeholder.split_once(":-") {
            Some((key, fallback)) => (key, Some(fallback)),
            None => (placeholder, None),
        };
        if key.is_empty() {
            return Err("empty env placeholder `${}`".to_string());
        }
        match (std::env::var(key), fallback) {
            (Ok(value), _) => out.push_str(value.as_str()),
            (Err(_), Some(fallback)) => out.push_str(fallback),
            (Err(_), None) => return Err(format!("missing env var for placeholder `${{{key}}}`")),
        }
        rest = &after_open[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
