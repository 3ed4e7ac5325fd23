pub const SCHEMA_JOB_CONFIG_0_0_1: &str = "jobgraph-job-config/0.0.1";
pub const SCHEMA_WORKFLOW_0_0_1: &str = "jobgraph-workflow/0.0.1";
