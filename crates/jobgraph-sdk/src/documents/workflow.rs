use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowDefinition {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub triggers: Vec<TriggerDefinition>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub trigger_type: TriggerType,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
    #[serde(default)]
    pub predicate: Option<PredicateDefinition>,
    #[serde(default)]
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ActionDefinition {
    pub job_name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredicateDefinition {
    #[serde(default)]
    pub conditions: Vec<ConditionDefinition>,
    #[serde(default)]
    pub logical: Option<PredicateLogical>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ConditionDefinition {
    pub job_name: String,
    #[serde(default)]
    pub logical_operator: Option<LogicalOperator>,
    #[serde(default)]
    pub state: Option<JobRunState>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct UnknownVariantError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    #[default]
    OnDemand,
    Scheduled,
    Conditional,
    Event,
}

impl TryFrom<String> for TriggerType {
    type Error = UnknownVariantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "ON_DEMAND" => Ok(TriggerType::OnDemand),
            "SCHEDULED" => Ok(TriggerType::Scheduled),
            "CONDITIONAL" => Ok(TriggerType::Conditional),
            "EVENT" => Ok(TriggerType::Event),
            _ => Err(UnknownVariantError {
                kind: "trigger type",
                value,
                expected: "ON_DEMAND, SCHEDULED, CONDITIONAL, EVENT",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredicateLogical {
    #[default]
    And,
    Or,
}

impl TryFrom<String> for PredicateLogical {
    type Error = UnknownVariantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "AND" => Ok(PredicateLogical::And),
            "OR" => Ok(PredicateLogical::Or),
            _ => Err(UnknownVariantError {
                kind: "predicate logical",
                value,
                expected: "AND, OR",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalOperator {
    #[default]
    Equals,
}

impl TryFrom<String> for LogicalOperator {
    type Error = UnknownVariantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "EQUALS" => Ok(LogicalOperator::Equals),
            _ => Err(UnknownVariantError {
                kind: "logical operator",
                value,
                expected: "EQUALS",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobRunState {
    #[default]
    Succeeded,
    Stopped,
    Failed,
    Timeout,
}

impl TryFrom<String> for JobRunState {
    type Error = UnknownVariantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "SUCCEEDED" => Ok(JobRunState::Succeeded),
            "STOPPED" => Ok(JobRunState::Stopped),
            "FAILED" => Ok(JobRunState::Failed),
            "TIMEOUT" => Ok(JobRunState::Timeout),
            _ => Err(UnknownVariantError {
                kind: "job run state",
                value,
                expected: "SUCCEEDED, STOPPED, FAILED, TIMEOUT",
            }),
        }
    }
}

#[cfg(test)]
#[path = "workflow_test.rs"]
mod tests;
