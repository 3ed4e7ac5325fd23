use super::{
    load_default_templates, load_job_override, load_workflow_definitions, TemplateError,
    PYTHON_TEMPLATE_FILE, SPARK_TEMPLATE_FILE,
};
use jobgraph_sdk::JobType;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn loads_both_default_templates() {
    let dir = temp_dir("templates");
    write(dir.join(PYTHON_TEMPLATE_FILE), r#"{ "type": "python", "timeout_minutes": 60 }"#);
    write(dir.join(SPARK_TEMPLATE_FILE), r#"{ "type": "spark", "worker_type": "G.1X", "number_of_workers": 2 }"#);

    let templates = load_default_templates(&dir).expect("templates must load");

    assert_eq!(templates.python().timeout_minutes, Some(60));
    assert_eq!(templates.spark().declared_type(), JobType::Spark);
    assert_eq!(templates.spark().number_of_workers, Some(2));
}

#[test]
fn missing_template_is_fatal() {
    let dir = temp_dir("templates-missing");
    write(dir.join(PYTHON_TEMPLATE_FILE), "{}");

    match load_default_templates(&dir) {
        Err(TemplateError::Missing { path }) => assert!(path.ends_with(SPARK_TEMPLATE_FILE)),
        other => panic!("expected missing template, got {other:?}"),
    }
}

#[test]
fn unparsable_template_is_fatal() {
    let dir = temp_dir("templates-invalid");
    write(dir.join(PYTHON_TEMPLATE_FILE), "{ not json");
    write(dir.join(SPARK_TEMPLATE_FILE), "{}");

    match load_default_templates(&dir) {
        Err(TemplateError::Invalid { issues, .. }) => {
            assert!(!issues.is_empty());
            assert!(issues[0].file().is_some());
        }
        other => panic!("expected invalid template, got {other:?}"),
    }
}

#[test]
fn override_issues_name_the_job_and_file() {
    let dir = temp_dir("override-bad");
    let path = dir.join("job_config.json");
    write(&path, r#"{ "timeout_minutes": 0 }"#);

    let issues = load_job_override("load_data_job", &path).expect_err("must reject");

    assert_eq!(issues[0].subject.as_deref(), Some("load_data_job"));
    assert_eq!(issues[0].file(), Some(path.display().to_string().as_str()));
}

#[test]
fn workflows_load_in_name_order_and_bad_files_do_not_block_others() {
    let dir = temp_dir("workflows");
    write(dir.join("b_flow.json"), r#"{ "triggers": [] }"#);
    write(dir.join("a_flow.json"), r#"{ "description": "first", "triggers": [] }"#);
    write(dir.join("broken.json"), r#"{ "triggers": [ { "type": "SCHEDULED", "unknown": 1 } ] }"#);
    write(dir.join("notes.txt"), "ignored");

    let loaded = load_workflow_definitions(&dir);

    let names = loaded
        .definitions
        .iter()
        .map(|definition| definition.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["a_flow", "b_flow"]);
    assert_eq!(loaded.definitions[0].description.as_deref(), Some("first"));
    assert!(!loaded.issues.is_empty());
    assert!(loaded
        .issues
        .iter()
        .all(|issue| issue.subject.as_deref() == Some("broken")));
}

#[test]
fn missing_workflows_directory_yields_nothing() {
    let loaded = load_workflow_definitions(&temp_dir("workflows-none").join("absent"));

    assert!(loaded.definitions.is_empty());
    assert!(loaded.issues.is_empty());
}

fn temp_dir(prefix: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time must be monotonic")
        .as_nanos();
    path.push(format!("jobgraph-io-{prefix}-{}-{nanos}", std::process::id()));
    fs::create_dir_all(&path).expect("must create temp dir");
    path
}

fn write(path: impl AsRef<Path>, content: &str) {
    fs::write(path.as_ref(), content).expect("must write fixture");
}
