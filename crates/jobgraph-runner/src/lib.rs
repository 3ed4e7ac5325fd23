mod cli;
mod config;
mod io;
mod pipeline;
mod render;
mod run;

pub use cli::{Cli, Commands, DiscoverCommand, OutputFormat, SourceArgs, SynthCommand, ValidateCommand};
pub use config::{
    load_runner_config, validate_runner_config, CompileConfig, DiscoveryConfig, PathsConfig,
    ResolvedPaths, RunnerConfig, RunnerConfigError, StackConfig, RUNNER_CONFIG_SCHEMA_0_0_1,
};
pub use io::{
    load_default_templates, load_job_override, load_workflow_definitions, LoadedWorkflows,
    TemplateError,
};
pub use pipeline::{synthesize, PipelineError, SynthesisInput, SynthesisSummary};
pub use run::{execute_discover, execute_synth, execute_validate, RunnerError};
