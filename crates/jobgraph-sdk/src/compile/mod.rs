mod references;

use crate::descriptors::{
    trigger_logical_id, workflow_logical_id, ActionDescriptor, ConditionDescriptor,
    PredicateDescriptor, TriggerActivation, TriggerDescriptor, WorkflowDescriptor,
};
use crate::documents::{PredicateDefinition, TriggerDefinition, TriggerType, WorkflowDefinition};
use jobgraph_core::{has_errors, FieldPath, IssueSeverity, StructuredIssue};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

pub use references::JobReferences;

pub const DEFAULT_SCHEDULE: &str = "cron(0 0 * * ? *)";

/// What to do with a trigger action or predicate condition naming a job
/// that was not built in this run. Applied the same way to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReferencePolicy {
    #[default]
    Fail,
    Drop,
}

#[derive(Debug, Clone)]
pub struct CompileWorkflowOptions {
    pub unresolved_references: UnresolvedReferencePolicy,
    pub default_schedule: String,
}

impl Default for CompileWorkflowOptions {
    fn default() -> Self {
        Self {
            unresolved_references: UnresolvedReferencePolicy::Fail,
            default_schedule: DEFAULT_SCHEDULE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CompileWorkflowResult {
    Ok {
        workflow: WorkflowDescriptor,
        warnings: Vec<StructuredIssue>,
    },
    Err {
        issues: Vec<StructuredIssue>,
    },
}

pub fn compile_workflow(
    definition: &WorkflowDefinition,
    jobs: &JobReferences,
    options: &CompileWorkflowOptions,
) -> CompileWorkflowResult {
    let mut compiler = TriggerCompiler {
        workflow_name: definition.name.as_str(),
        jobs,
        options,
        issues: Vec::new(),
    };

    let mut seen_names = HashSet::new();
    let mut triggers = Vec::with_capacity(definition.triggers.len());
    for (index, trigger) in definition.triggers.iter().enumerate() {
        let base_path = FieldPath::key("triggers").with_index(index);
        let name = trigger
            .name
            .clone()
            .unwrap_or_else(|| format!("Trigger-{index}"));
        if !seen_names.insert(name.clone()) {
            compiler.error(
                &name,
                base_path.with_key("name"),
                format!("duplicate trigger name `{name}`"),
                "workflow.trigger.name_duplicate",
            );
            continue;
        }
        if let Some(descriptor) = compiler.compile_trigger(trigger, name, &base_path) {
            triggers.push(descriptor);
        }
    }

    let mut issues = compiler.issues;
    StructuredIssue::sort_stable(&mut issues);
    if has_errors(&issues) {
        return CompileWorkflowResult::Err { issues };
    }

    let description = definition
        .description
        .clone()
        .unwrap_or_else(|| format!("Workflow for {}", definition.name));
    CompileWorkflowResult::Ok {
        workflow: WorkflowDescriptor {
            logical_id: workflow_logical_id(&definition.name),
            name: definition.name.clone(),
            description,
            triggers,
        },
        warnings: issues,
    }
}

struct TriggerCompiler<'a> {
    workflow_name: &'a str,
    jobs: &'a JobReferences,
    options: &'a CompileWorkflowOptions,
    issues: Vec<StructuredIssue>,
}

impl TriggerCompiler<'_> {
    fn compile_trigger(
        &mut self,
        trigger: &TriggerDefinition,
        name: String,
        base_path: &FieldPath,
    ) -> Option<TriggerDescriptor> {
        let actions = self.resolve_actions(trigger, &name, base_path);

        let trigger_type = trigger.trigger_type;
        if trigger.schedule.is_some() && trigger_type != TriggerType::Scheduled {
            self.warning(
                &name,
                base_path.clone().with_key("schedule"),
                format!("`schedule` is ignored on {} triggers", type_label(trigger_type)),
                "workflow.trigger.schedule_ignored",
            );
        }
        if trigger.predicate.is_some() && trigger_type != TriggerType::Conditional {
            self.warning(
                &name,
                base_path.clone().with_key("predicate"),
                format!("`predicate` is ignored on {} triggers", type_label(trigger_type)),
                "workflow.trigger.predicate_ignored",
            );
        }

        let activation = match trigger_type {
            TriggerType::OnDemand => TriggerActivation::OnDemand,
            TriggerType::Event => TriggerActivation::Event,
            TriggerType::Scheduled => {
                let schedule = trigger
                    .schedule
                    .clone()
                    .unwrap_or_else(|| self.options.default_schedule.clone());
                if !schedule_pattern().is_match(&schedule) {
                    self.error(
                        &name,
                        base_path.clone().with_key("schedule"),
                        format!("schedule `{schedule}` must have the form `cron(<fields>)`"),
                        "workflow.trigger.schedule_invalid",
                    );
                    return None;
                }
                TriggerActivation::Scheduled { schedule }
            }
            TriggerType::Conditional => {
                let Some(predicate) = trigger.predicate.as_ref() else {
                    self.error(
                        &name,
                        base_path.clone().with_key("predicate"),
                        "CONDITIONAL trigger requires a `predicate`".to_string(),
                        "workflow.trigger.predicate_required",
                    );
                    return None;
                };
                let predicate_path = base_path.clone().with_key("predicate");
                let predicate = self.resolve_predicate(predicate, &name, &predicate_path)?;
                TriggerActivation::Conditional { predicate }
            }
        };

        // Unresolved actions are already reported on their own.
        if trigger.actions.is_empty() {
            self.warning(
                &name,
                base_path.clone().with_key("actions"),
                "trigger starts no jobs".to_string(),
                "workflow.trigger.actions_empty",
            );
        }

        Some(TriggerDescriptor {
            logical_id: trigger_logical_id(self.workflow_name, &name),
            name,
            workflow_name: self.workflow_name.to_string(),
            activation,
            actions,
        })
    }

    fn resolve_actions(
        &mut self,
        trigger: &TriggerDefinition,
        trigger_name: &str,
        base_path: &FieldPath,
    ) -> Vec<ActionDescriptor> {
        let mut actions = Vec::with_capacity(trigger.actions.len());
        for (index, action) in trigger.actions.iter().enumerate() {
            let path = base_path.clone().with_key("actions").with_index(index).with_key("jobName");
            let Some(stable_name) =
                self.resolve_job(trigger_name, &action.job_name, path, "action_job_unknown")
            else {
                continue;
            };
            actions.push(ActionDescriptor {
                job_name: stable_name,
                arguments: action.arguments.clone(),
            });
        }
        actions
    }

    fn resolve_predicate(
        &mut self,
        predicate: &PredicateDefinition,
        trigger_name: &str,
        predicate_path: &FieldPath,
    ) -> Option<PredicateDescriptor> {
        let mut conditions = Vec::with_capacity(predicate.conditions.len());
        for (index, condition) in predicate.conditions.iter().enumerate() {
            let path = predicate_path
                .clone()
                .with_key("conditions")
                .with_index(index)
                .with_key("jobName");
            let Some(stable_name) =
                self.resolve_job(trigger_name, &condition.job_name, path, "condition_job_unknown")
            else {
                continue;
            };
            conditions.push(ConditionDescriptor {
                job_name: stable_name,
                logical_operator: condition.logical_operator.unwrap_or_default(),
                state: condition.state.unwrap_or_default(),
            });
        }

        if conditions.is_empty() {
            self.error(
                trigger_name,
                predicate_path.clone().with_key("conditions"),
                "predicate has no conditions on known jobs".to_string(),
                "workflow.trigger.predicate_conditions_empty",
            );
            return None;
        }

        Some(PredicateDescriptor {
            conditions,
            logical: predicate.logical.unwrap_or_default(),
        })
    }

    fn resolve_job(
        &mut self,
        trigger_name: &str,
        job_name: &str,
        path: FieldPath,
        reference_suffix: &str,
    ) -> Option<String> {
        if let Some(stable_name) = self.jobs.resolve(job_name) {
            return Some(stable_name.to_string());
        }

        let reference = format!("workflow.trigger.{reference_suffix}");
        let severity = match self.options.unresolved_references {
            UnresolvedReferencePolicy::Fail => IssueSeverity::Error,
            UnresolvedReferencePolicy::Drop => {
                debug!(
                    workflow = %self.workflow_name,
                    trigger = %trigger_name,
                    job = %job_name,
                    "dropping reference to unknown job"
                );
                IssueSeverity::Warning
            }
        };
        self.issues.push(
            StructuredIssue::new(
                "compile_error",
                severity,
                path,
                format!("job `{job_name}` is not defined in this run"),
                &reference,
            )
            .with_subject(trigger_name)
            .with_related(json!({ "workflow": self.workflow_name, "job": job_name })),
        );
        None
    }

    fn error(&mut self, trigger_name: &str, path: FieldPath, message: String, reference: &str) {
        self.push(IssueSeverity::Error, trigger_name, path, message, reference);
    }

    fn warning(&mut self, trigger_name: &str, path: FieldPath, message: String, reference: &str) {
        self.push(IssueSeverity::Warning, trigger_name, path, message, reference);
    }

    fn push(
        &mut self,
        severity: IssueSeverity,
        trigger_name: &str,
        path: FieldPath,
        message: String,
        reference: &str,
    ) {
        self.issues.push(
            StructuredIssue::new("compile_error", severity, path, message, reference)
                .with_subject(trigger_name)
                .with_related(json!({ "workflow": self.workflow_name })),
        );
    }
}

fn type_label(trigger_type: TriggerType) -> &'static str {
    match trigger_type {
        TriggerType::OnDemand => "ON_DEMAND",
        TriggerType::Scheduled => "SCHEDULED",
        TriggerType::Conditional => "CONDITIONAL",
        TriggerType::Event => "EVENT",
    }
}

fn schedule_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^cron\(\s*\S+(\s+\S+){4,5}\s*\)$").expect("valid regex"))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
