mod job;
mod workflow;

pub use job::{JobCommand, JobDescriptor, JobEngine};
pub use workflow::{
    trigger_logical_id, workflow_logical_id, ActionDescriptor, ConditionDescriptor,
    PredicateDescriptor, TriggerActivation, TriggerDescriptor, WorkflowDescriptor,
};
