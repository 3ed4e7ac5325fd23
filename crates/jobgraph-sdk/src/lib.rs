pub mod compile;
pub mod descriptors;
pub mod discover;
pub mod documents;
pub mod job;
pub mod parse;
pub mod provision;
pub mod resolve;

pub use compile::{
    compile_workflow, CompileWorkflowOptions, CompileWorkflowResult, JobReferences,
    UnresolvedReferencePolicy, DEFAULT_SCHEDULE,
};
pub use descriptors::{
    trigger_logical_id, workflow_logical_id, ActionDescriptor, ConditionDescriptor, JobCommand,
    JobDescriptor, JobEngine, PredicateDescriptor, TriggerActivation, TriggerDescriptor,
    WorkflowDescriptor,
};
pub use discover::{
    discover_job_artifacts, DiscoveryOptions, JobArtifact, DEFAULT_ARTIFACT_SUFFIX,
    DEFAULT_OVERRIDE_FILE,
};
pub use documents::{
    ActionDefinition, ConditionDefinition, JobConfig, JobRunState, JobType, LogicalOperator,
    PredicateDefinition, PredicateLogical, TriggerDefinition, TriggerType, UnknownVariantError,
    WorkflowDefinition,
};
pub use job::{
    build_job_descriptor, job_logical_id, JobBuild, JobBuildInput, GROUP_TAG_KEY,
    SCRATCH_ARGUMENT_KEY,
};
pub use parse::{parse_job_config, parse_json, parse_workflow_definition};
pub use provision::{
    DeploymentManifest, ManifestAsset, ManifestBackend, ManifestBackendOptions, ManifestResource,
    ProvisionedJob, ProvisioningBackend, RoleSpec, ScratchBucket, MANIFEST_SCHEMA_0_0_1,
};
pub use resolve::{resolve_job_config, DefaultTemplates, ResolvedJobConfig};
