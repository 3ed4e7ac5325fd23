use crate::cli::{DiscoverCommand, OutputFormat, SourceArgs, SynthCommand, ValidateCommand};
use crate::{execute_discover, execute_synth, execute_validate, RunnerError, TemplateError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn source(root: &Path) -> SourceArgs {
    SourceArgs {
        config: None,
        root: Some(root.to_path_buf()),
    }
}

fn fixture_repo(prefix: &str) -> PathBuf {
    let root = temp_dir(prefix);
    write(
        root.join("config/jobs/base/default_python_job_config.json"),
        r#"{ "type": "python", "glue_version": "3.0", "python_version": "3.10", "timeout_minutes": 60, "max_retries": 2 }"#,
    );
    write(
        root.join("config/jobs/base/default_spark_job_config.json"),
        r#"{ "type": "spark", "glue_version": "4.0", "worker_type": "G.1X", "number_of_workers": 2 }"#,
    );
    write(root.join("jobs/extract/extract_data_job.py"), "print('extract')");
    write(
        root.join("workflows/daily.json"),
        r#"{ "triggers": [ { "type": "scheduled", "actions": [ { "jobName": "extract_data_job" } ] } ] }"#,
    );
    root
}

#[test]
fn synth_writes_manifest_and_json_summary() {
    let root = fixture_repo("synth");
    let out = root.join("build/manifest.json");

    let output = execute_synth(&SynthCommand {
        source: source(&root),
        out: Some(out.clone()),
        format: OutputFormat::Json,
    })
    .expect("synth must succeed");

    let summary: Value = serde_json::from_str(output.as_str()).expect("summary must be json");
    assert_eq!(summary["jobs"], serde_json::json!(["extract_data_job"]));
    assert_eq!(summary["workflows"], serde_json::json!(["daily"]));
    assert_eq!(summary["trigger_count"], serde_json::json!(1));

    let manifest: Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("manifest written")).expect("manifest json");
    assert_eq!(manifest["schema"], serde_json::json!("jobgraph-manifest/0.0.1"));
    assert_eq!(manifest["fingerprint"], summary["fingerprint"]);
}

#[test]
fn synth_text_summary_is_readable() {
    let root = fixture_repo("synth-text");

    let output = execute_synth(&SynthCommand {
        source: source(&root),
        out: None,
        format: OutputFormat::Text,
    })
    .expect("synth must succeed");

    assert!(output.starts_with("jobgraph synth\n"));
    assert!(output.contains("jobs: extract_data_job"));
    assert!(output.contains("scratch_bucket: gluejobsstack-glue-scripts-us-west-2"));
    assert!(output.contains("triggers: 1"));
}

#[test]
fn validate_fails_on_unknown_reference_and_writes_nothing() {
    let root = fixture_repo("validate");
    write(
        root.join("workflows/daily.json"),
        r#"{ "triggers": [ { "actions": [ { "jobName": "missing_job" } ] } ] }"#,
    );

    let error = execute_validate(&ValidateCommand {
        source: source(&root),
        format: OutputFormat::Text,
    })
    .expect_err("validate must fail");

    assert!(matches!(error, RunnerError::Pipeline(_)));
    assert!(error.to_string().contains("workflow.trigger.action_job_unknown"));
}

#[test]
fn missing_templates_abort_the_run() {
    let root = fixture_repo("no-templates");
    fs::remove_dir_all(root.join("config")).expect("remove templates");

    let error = execute_validate(&ValidateCommand {
        source: source(&root),
        format: OutputFormat::Text,
    })
    .expect_err("must fail");

    assert!(matches!(error, RunnerError::Template(TemplateError::Missing { .. })));
}

#[test]
fn config_file_directory_is_the_default_base() {
    let root = fixture_repo("config-base");
    write(
        root.join("jobgraph.yaml"),
        "schema: jobgraph-runner/0.0.1\nstack:\n  name: DataJobs\n",
    );

    let output = execute_validate(&ValidateCommand {
        source: SourceArgs {
            config: Some(root.join("jobgraph.yaml")),
            root: None,
        },
        format: OutputFormat::Text,
    })
    .expect("validate must succeed");

    assert!(output.contains("scratch_bucket: datajobs-glue-scripts-us-west-2"));
}

#[test]
fn discover_lists_artifacts_as_json() {
    let root = fixture_repo("discover");
    write(root.join("jobs/load/load_data_job.py"), "");
    write(root.join("jobs/load/job_config.json"), "{}");

    let output = execute_discover(&DiscoverCommand {
        source: source(&root),
        format: OutputFormat::Json,
    })
    .expect("discover must succeed");

    let parsed: Value = serde_json::from_str(output.as_str()).expect("must be json");
    let artifacts = parsed["artifacts"].as_array().expect("artifacts");
    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0]["name"], serde_json::json!("extract_data_job"));
    assert_eq!(artifacts[1]["group_label"], serde_json::json!("load"));
    assert!(artifacts[1]["override_config_path"].is_string());
}

fn temp_dir(prefix: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time must be monotonic")
        .as_nanos();
    path.push(format!("jobgraph-run-{prefix}-{}-{nanos}", std::process::id()));
    fs::create_dir_all(&path).expect("must create temp dir");
    path
}

fn write(path: impl AsRef<Path>, content: &str) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("must create fixture dir");
    }
    fs::write(path, content).expect("must write fixture");
}
