mod read_document;

pub use read_document::{
    load_default_templates, load_job_override, load_workflow_definitions, LoadedWorkflows,
    TemplateError, PYTHON_TEMPLATE_FILE, SPARK_TEMPLATE_FILE,
};
