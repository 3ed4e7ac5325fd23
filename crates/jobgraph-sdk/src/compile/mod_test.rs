use super::{
    compile_workflow, CompileWorkflowOptions, CompileWorkflowResult, JobReferences,
    UnresolvedReferencePolicy, DEFAULT_SCHEDULE,
};
use crate::descriptors::{TriggerActivation, TriggerDescriptor};
use crate::documents::{JobRunState, LogicalOperator, PredicateLogical, TriggerType, WorkflowDefinition};
use jobgraph_core::{IssueSeverity, StructuredIssue};
use serde_json::json;

fn workflow(name: &str, body: serde_json::Value) -> WorkflowDefinition {
    let mut definition: WorkflowDefinition = serde_json::from_value(body).expect("workflow fixture");
    definition.name = name.to_string();
    definition
}

fn known_jobs() -> JobReferences {
    [("extract_data_job", "extract_data_job"), ("load_data_job", "load_data_job")]
        .into_iter()
        .collect()
}

fn compile_ok(definition: &WorkflowDefinition, options: &CompileWorkflowOptions) -> (Vec<TriggerDescriptor>, Vec<StructuredIssue>) {
    match compile_workflow(definition, &known_jobs(), options) {
        CompileWorkflowResult::Ok { workflow, warnings } => (workflow.triggers, warnings),
        CompileWorkflowResult::Err { issues } => panic!("unexpected compile errors: {issues:?}"),
    }
}

fn compile_err(definition: &WorkflowDefinition, options: &CompileWorkflowOptions) -> Vec<StructuredIssue> {
    match compile_workflow(definition, &known_jobs(), options) {
        CompileWorkflowResult::Ok { workflow, .. } => panic!("expected errors, compiled {workflow:?}"),
        CompileWorkflowResult::Err { issues } => issues,
    }
}

fn references(issues: &[StructuredIssue]) -> Vec<&str> {
    issues.iter().filter_map(|issue| issue.reference.as_deref()).collect()
}

fn drop_policy() -> CompileWorkflowOptions {
    CompileWorkflowOptions {
        unresolved_references: UnresolvedReferencePolicy::Drop,
        ..CompileWorkflowOptions::default()
    }
}

#[test]
fn scheduled_trigger_without_schedule_uses_daily_default() {
    let definition = workflow(
        "nightly_etl",
        json!({
            "triggers": [
                { "type": "SCHEDULED", "actions": [ { "jobName": "extract_data_job" } ] }
            ]
        }),
    );

    let (triggers, warnings) = compile_ok(&definition, &CompileWorkflowOptions::default());

    assert!(warnings.is_empty());
    assert_eq!(triggers.len(), 1);
    let trigger = &triggers[0];
    assert_eq!(trigger.name, "Trigger-0");
    assert_eq!(trigger.workflow_name, "nightly_etl");
    assert_eq!(trigger.logical_id, "TriggerNightlyEtlTrigger-0");
    assert_eq!(trigger.activation.schedule(), Some(DEFAULT_SCHEDULE));
    assert!(trigger.activation.predicate().is_none());
    assert_eq!(trigger.actions.len(), 1);
    assert_eq!(trigger.actions[0].job_name, "extract_data_job");
}

#[test]
fn workflow_description_defaults_from_name() {
    let definition = workflow("nightly_etl", json!({ "triggers": [] }));

    match compile_workflow(&definition, &known_jobs(), &CompileWorkflowOptions::default()) {
        CompileWorkflowResult::Ok { workflow, .. } => {
            assert_eq!(workflow.description, "Workflow for nightly_etl");
            assert_eq!(workflow.logical_id, "GlueWorkflowNightlyEtl");
        }
        CompileWorkflowResult::Err { issues } => panic!("unexpected errors: {issues:?}"),
    }
}

#[test]
fn conditional_trigger_applies_condition_defaults() {
    let definition = workflow(
        "nightly_etl",
        json!({
            "description": "extract then load",
            "triggers": [
                {
                    "name": "after_extract",
                    "type": "conditional",
                    "actions": [ { "jobName": "load_data_job", "arguments": { "--mode": "full" } } ],
                    "predicate": { "conditions": [ { "jobName": "extract_data_job" } ] }
                }
            ]
        }),
    );

    let (triggers, warnings) = compile_ok(&definition, &CompileWorkflowOptions::default());

    assert!(warnings.is_empty());
    let trigger = &triggers[0];
    assert_eq!(trigger.trigger_type(), TriggerType::Conditional);
    assert!(trigger.activation.schedule().is_none());
    let predicate = trigger.activation.predicate().expect("predicate");
    assert_eq!(predicate.logical, PredicateLogical::And);
    assert_eq!(predicate.conditions[0].job_name, "extract_data_job");
    assert_eq!(predicate.conditions[0].logical_operator, LogicalOperator::Equals);
    assert_eq!(predicate.conditions[0].state, JobRunState::Succeeded);
    assert_eq!(trigger.actions[0].arguments.get("--mode"), Some(&json!("full")));
}

#[test]
fn conditional_trigger_with_unknown_job_fails_by_default() {
    let definition = workflow(
        "nightly_etl",
        json!({
            "triggers": [
                {
                    "name": "after_missing",
                    "type": "CONDITIONAL",
                    "actions": [ { "jobName": "load_data_job" } ],
                    "predicate": { "conditions": [ { "jobName": "missing_job" } ] }
                }
            ]
        }),
    );

    let issues = compile_err(&definition, &CompileWorkflowOptions::default());

    let unknown = issues
        .iter()
        .find(|issue| issue.reference.as_deref() == Some("workflow.trigger.condition_job_unknown"))
        .expect("condition issue");
    assert_eq!(unknown.severity, IssueSeverity::Error);
    assert_eq!(unknown.subject.as_deref(), Some("after_missing"));
    assert_eq!(unknown.field_path.to_string(), "$.triggers[0].predicate.conditions[0].jobName");
}

#[test]
fn drop_policy_removes_unknown_conditions_and_keeps_known_ones() {
    let definition = workflow(
        "nightly_etl",
        json!({
            "triggers": [
                {
                    "type": "CONDITIONAL",
                    "actions": [ { "jobName": "load_data_job" }, { "jobName": "missing_job" } ],
                    "predicate": {
                        "logical": "OR",
                        "conditions": [
                            { "jobName": "missing_job", "state": "FAILED" },
                            { "jobName": "extract_data_job" }
                        ]
                    }
                }
            ]
        }),
    );

    let (triggers, warnings) = compile_ok(&definition, &drop_policy());

    let trigger = &triggers[0];
    let predicate = trigger.activation.predicate().expect("predicate");
    assert_eq!(predicate.logical, PredicateLogical::Or);
    assert_eq!(predicate.conditions.len(), 1);
    assert_eq!(predicate.conditions[0].job_name, "extract_data_job");
    assert_eq!(trigger.actions.len(), 1);
    assert_eq!(trigger.actions[0].job_name, "load_data_job");
    assert!(warnings.iter().all(|issue| issue.severity == IssueSeverity::Warning));
    let mut refs = references(&warnings);
    refs.sort_unstable();
    assert_eq!(
        refs,
        vec!["workflow.trigger.action_job_unknown", "workflow.trigger.condition_job_unknown"]
    );
}

#[test]
fn drop_policy_still_fails_when_every_condition_is_unknown() {
    let definition = workflow(
        "nightly_etl",
        json!({
            "triggers": [
                {
                    "type": "CONDITIONAL",
                    "actions": [ { "jobName": "load_data_job" } ],
                    "predicate": { "conditions": [ { "jobName": "missing_job" } ] }
                }
            ]
        }),
    );

    let issues = compile_err(&definition, &drop_policy());

    assert!(references(&issues).contains(&"workflow.trigger.predicate_conditions_empty"));
}

#[test]
fn unknown_action_fails_by_default() {
    let definition = workflow(
        "nightly_etl",
        json!({ "triggers": [ { "actions": [ { "jobName": "missing_job" } ] } ] }),
    );

    let issues = compile_err(&definition, &CompileWorkflowOptions::default());

    assert_eq!(references(&issues), vec!["workflow.trigger.action_job_unknown"]);
}

#[test]
fn dropped_actions_are_not_reported_as_empty() {
    let definition = workflow(
        "nightly_etl",
        json!({ "triggers": [ { "actions": [ { "jobName": "missing_job" } ] } ] }),
    );

    let (triggers, warnings) = compile_ok(&definition, &drop_policy());

    assert!(triggers[0].actions.is_empty());
    assert_eq!(references(&warnings), vec!["workflow.trigger.action_job_unknown"]);
}

#[test]
fn or_predicate_is_emitted_as_declared() {
    let definition = workflow(
        "nightly_etl",
        json!({
            "triggers": [
                {
                    "type": "CONDITIONAL",
                    "actions": [ { "jobName": "load_data_job" } ],
                    "predicate": {
                        "logical": "OR",
                        "conditions": [ { "jobName": "extract_data_job" } ]
                    }
                }
            ]
        }),
    );

    let (triggers, _) = compile_ok(&definition, &CompileWorkflowOptions::default());

    let value = serde_json::to_value(&triggers[0]).expect("serialize trigger");
    assert_eq!(value["Predicate"]["Logical"], json!("OR"));
}

#[test]
fn conditional_trigger_requires_predicate() {
    let definition = workflow(
        "nightly_etl",
        json!({ "triggers": [ { "type": "CONDITIONAL", "actions": [ { "jobName": "load_data_job" } ] } ] }),
    );

    let issues = compile_err(&definition, &CompileWorkflowOptions::default());

    assert_eq!(references(&issues), vec!["workflow.trigger.predicate_required"]);
}

#[test]
fn fields_for_other_trigger_types_are_ignored_with_warnings() {
    let definition = workflow(
        "nightly_etl",
        json!({
            "triggers": [
                {
                    "type": "ON_DEMAND",
                    "schedule": "cron(0 6 * * ? *)",
                    "predicate": { "conditions": [ { "jobName": "extract_data_job" } ] },
                    "actions": [ { "jobName": "extract_data_job" } ]
                }
            ]
        }),
    );

    let (triggers, warnings) = compile_ok(&definition, &CompileWorkflowOptions::default());

    assert_eq!(triggers[0].activation, TriggerActivation::OnDemand);
    let mut refs = references(&warnings);
    refs.sort_unstable();
    assert_eq!(
        refs,
        vec!["workflow.trigger.predicate_ignored", "workflow.trigger.schedule_ignored"]
    );
}

#[test]
fn explicit_schedule_is_kept_and_validated() {
    let kept = workflow(
        "nightly_etl",
        json!({ "triggers": [ { "type": "SCHEDULED", "schedule": "cron(15 2 * * ? *)", "actions": [ { "jobName": "extract_data_job" } ] } ] }),
    );
    let (triggers, _) = compile_ok(&kept, &CompileWorkflowOptions::default());
    assert_eq!(triggers[0].activation.schedule(), Some("cron(15 2 * * ? *)"));

    let invalid = workflow(
        "nightly_etl",
        json!({ "triggers": [ { "type": "SCHEDULED", "schedule": "every day", "actions": [ { "jobName": "extract_data_job" } ] } ] }),
    );
    let issues = compile_err(&invalid, &CompileWorkflowOptions::default());
    assert_eq!(references(&issues), vec!["workflow.trigger.schedule_invalid"]);
}

#[test]
fn duplicate_trigger_names_are_rejected() {
    let definition = workflow(
        "nightly_etl",
        json!({
            "triggers": [
                { "name": "start", "actions": [ { "jobName": "extract_data_job" } ] },
                { "name": "start", "actions": [ { "jobName": "load_data_job" } ] }
            ]
        }),
    );

    let issues = compile_err(&definition, &CompileWorkflowOptions::default());

    assert_eq!(references(&issues), vec!["workflow.trigger.name_duplicate"]);
    assert_eq!(issues[0].field_path.to_string(), "$.triggers[1].name");
}

#[test]
fn trigger_without_actions_is_a_warning() {
    let definition = workflow("nightly_etl", json!({ "triggers": [ { "type": "EVENT" } ] }));

    let (triggers, warnings) = compile_ok(&definition, &CompileWorkflowOptions::default());

    assert_eq!(triggers[0].activation, TriggerActivation::Event);
    assert_eq!(references(&warnings), vec!["workflow.trigger.actions_empty"]);
}

#[test]
fn actions_use_backend_stable_names() {
    let jobs: JobReferences = [("extract_data_job", "jobs-extract_data_job-7f3a")].into_iter().collect();
    let definition = workflow(
        "nightly_etl",
        json!({ "triggers": [ { "actions": [ { "jobName": "extract_data_job" } ] } ] }),
    );

    match compile_workflow(&definition, &jobs, &CompileWorkflowOptions::default()) {
        CompileWorkflowResult::Ok { workflow, .. } => {
            assert_eq!(workflow.triggers[0].actions[0].job_name, "jobs-extract_data_job-7f3a");
        }
        CompileWorkflowResult::Err { issues } => panic!("unexpected errors: {issues:?}"),
    }
}
