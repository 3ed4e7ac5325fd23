use crate::documents::{JobRunState, LogicalOperator, PredicateLogical, TriggerType};
use jobgraph_core::normalize_identifier;
use serde::Serialize;
use serde_json::{Map, Value};

pub fn workflow_logical_id(workflow_name: &str) -> String {
    format!("GlueWorkflow{}", normalize_identifier(workflow_name))
}

/// Default trigger names repeat across workflows, so the workflow name is
/// part of the trigger's stack-local identifier.
pub fn trigger_logical_id(workflow_name: &str, trigger_name: &str) -> String {
    format!(
        "Trigger{}{}",
        normalize_identifier(workflow_name),
        normalize_identifier(trigger_name)
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkflowDescriptor {
    #[serde(skip)]
    pub logical_id: String,
    pub name: String,
    pub description: String,
    pub triggers: Vec<TriggerDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionDescriptor {
    pub job_name: String,
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConditionDescriptor {
    pub job_name: String,
    pub logical_operator: LogicalOperator,
    pub state: JobRunState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PredicateDescriptor {
    pub conditions: Vec<ConditionDescriptor>,
    pub logical: PredicateLogical,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerActivation {
    OnDemand,
    Event,
    Scheduled { schedule: String },
    Conditional { predicate: PredicateDescriptor },
}

impl TriggerActivation {
    pub fn trigger_type(&self) -> TriggerType {
        match self {
            TriggerActivation::OnDemand => TriggerType::OnDemand,
            TriggerActivation::Event => TriggerType::Event,
            TriggerActivation::Scheduled { .. } => TriggerType::Scheduled,
            TriggerActivation::Conditional { .. } => TriggerType::Conditional,
        }
    }

    pub fn schedule(&self) -> Option<&str> {
        match self {
            TriggerActivation::Scheduled { schedule } => Some(schedule.as_str()),
            _ => None,
        }
    }

    pub fn predicate(&self) -> Option<&PredicateDescriptor> {
        match self {
            TriggerActivation::Conditional { predicate } => Some(predicate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "TriggerProperties")]
pub struct TriggerDescriptor {
    pub logical_id: String,
    pub name: String,
    pub workflow_name: String,
    pub activation: TriggerActivation,
    pub actions: Vec<ActionDescriptor>,
}

impl TriggerDescriptor {
    pub fn trigger_type(&self) -> TriggerType {
        self.activation.trigger_type()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TriggerProperties {
    name: String,
    #[serde(rename = "Type")]
    trigger_type: TriggerType,
    workflow_name: String,
    actions: Vec<ActionDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    predicate: Option<PredicateDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule: Option<String>,
}

impl From<TriggerDescriptor> for TriggerProperties {
    fn from(descriptor: TriggerDescriptor) -> Self {
        let trigger_type = descriptor.trigger_type();
        let (predicate, schedule) = match descriptor.activation {
            TriggerActivation::Scheduled { schedule } => (None, Some(schedule)),
            TriggerActivation::Conditional { predicate } => (Some(predicate), None),
            TriggerActivation::OnDemand | TriggerActivation::Event => (None, None),
        };
        TriggerProperties {
            name: descriptor.name,
            trigger_type,
            workflow_name: descriptor.workflow_name,
            actions: descriptor.actions,
            predicate,
            schedule,
        }
    }
}

#[cfg(test)]
#[path = "workflow_test.rs"]
mod tests;
