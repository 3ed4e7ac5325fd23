mod job_config;
mod workflow;

pub use job_config::{JobConfig, JobType};
pub use workflow::{
    ActionDefinition, ConditionDefinition, JobRunState, LogicalOperator, PredicateDefinition,
    PredicateLogical, TriggerDefinition, TriggerType, UnknownVariantError, WorkflowDefinition,
};
