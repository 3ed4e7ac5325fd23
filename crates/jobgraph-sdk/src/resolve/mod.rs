use crate::documents::{JobConfig, JobType};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefaultTemplates {
    python: JobConfig,
    spark: JobConfig,
}

impl DefaultTemplates {
    pub fn new(python: JobConfig, spark: JobConfig) -> Self {
        Self { python, spark }
    }

    pub fn python(&self) -> &JobConfig {
        &self.python
    }

    pub fn spark(&self) -> &JobConfig {
        &self.spark
    }

    pub fn template_for(&self, job_type: JobType) -> &JobConfig {
        match job_type {
            JobType::Python => &self.python,
            JobType::Spark => &self.spark,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedJobConfig {
    pub job_type: JobType,
    pub config: JobConfig,
}

impl ResolvedJobConfig {
    pub fn with_script_location(mut self, location: impl Into<String>) -> Self {
        self.config.script_location = Some(location.into());
        self
    }
}

pub fn resolve_job_config(overrides: &JobConfig, templates: &DefaultTemplates) -> ResolvedJobConfig {
    let job_type = overrides.declared_type();
    ResolvedJobConfig {
        job_type,
        config: templates.template_for(job_type).overlay(overrides),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
