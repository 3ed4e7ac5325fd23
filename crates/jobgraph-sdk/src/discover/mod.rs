use jobgraph_core::{FieldPath, StructuredIssue};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_ARTIFACT_SUFFIX: &str = "_job.py";
pub const DEFAULT_OVERRIDE_FILE: &str = "job_config.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    pub artifact_suffix: String,
    pub override_file: String,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            artifact_suffix: DEFAULT_ARTIFACT_SUFFIX.to_string(),
            override_file: DEFAULT_OVERRIDE_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobArtifact {
    pub name: String,
    pub path: PathBuf,
    pub override_config_path: Option<PathBuf>,
    pub group_label: String,
}

pub fn discover_job_artifacts(
    root: &Path,
    options: &DiscoveryOptions,
) -> Result<Vec<JobArtifact>, Vec<StructuredIssue>> {
    if !root.exists() {
        debug!(root = %root.display(), "job root does not exist, nothing to discover");
        return Ok(Vec::new());
    }

    let mut artifacts = Vec::new();
    let mut issues = Vec::new();
    walk(root, options, &mut artifacts, &mut issues);
    issues.extend(duplicate_name_issues(&artifacts));

    if issues.is_empty() {
        Ok(artifacts)
    } else {
        StructuredIssue::sort_stable(&mut issues);
        Err(issues)
    }
}

fn walk(
    dir: &Path,
    options: &DiscoveryOptions,
    artifacts: &mut Vec<JobArtifact>,
    issues: &mut Vec<StructuredIssue>,
) {
    let entries = match sorted_entries(dir) {
        Ok(entries) => entries,
        Err(error) => {
            issues.push(
                StructuredIssue::error(
                    "discovery_error",
                    FieldPath::root(),
                    format!("read_dir failed: {error}"),
                    "discovery.read_dir_failed",
                )
                .with_file(dir),
            );
            return;
        }
    };

    let mut subdirs = Vec::new();
    for path in entries {
        if path.is_dir() {
            // Linked directories are not descended into.
            if !is_symlink(&path) {
                subdirs.push(path);
            }
            continue;
        }
        let Some(file_name) = path.file_name().map(|name| name.to_string_lossy().into_owned()) else {
            continue;
        };
        if !file_name.ends_with(options.artifact_suffix.as_str()) {
            continue;
        }

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or(file_name);
        let override_path = dir.join(&options.override_file);
        let artifact = JobArtifact {
            name,
            override_config_path: override_path.is_file().then_some(override_path),
            group_label: directory_label(dir),
            path,
        };
        debug!(
            job = %artifact.name,
            group = %artifact.group_label,
            has_override = artifact.override_config_path.is_some(),
            "discovered job artifact"
        );
        artifacts.push(artifact);
    }

    for subdir in subdirs {
        walk(&subdir, options, artifacts, issues);
    }
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

fn directory_label(dir: &Path) -> String {
    if let Some(name) = dir.file_name() {
        return name.to_string_lossy().into_owned();
    }
    fs::canonicalize(dir)
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_default()
}

fn duplicate_name_issues(artifacts: &[JobArtifact]) -> Vec<StructuredIssue> {
    let mut paths_by_name: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for artifact in artifacts {
        paths_by_name
            .entry(artifact.name.as_str())
            .or_default()
            .push(artifact.path.display().to_string());
    }

    paths_by_name
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(name, paths)| {
            StructuredIssue::error(
                "discovery_error",
                FieldPath::root(),
                format!("job name `{name}` is declared by {} artifacts", paths.len()),
                "discovery.artifact_name_duplicate",
            )
            .with_subject(name)
            .with_related(json!({ "paths": paths }))
        })
        .collect()
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|metadata| metadata.file_type().is_symlink())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
