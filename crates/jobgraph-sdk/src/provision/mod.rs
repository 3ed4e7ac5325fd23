mod manifest;

use crate::descriptors::{JobDescriptor, TriggerDescriptor};
use serde::Serialize;
use std::path::Path;

pub use manifest::{
    DeploymentManifest, ManifestAsset, ManifestBackend, ManifestBackendOptions, ManifestResource,
    MANIFEST_SCHEMA_0_0_1,
};

pub trait ProvisioningBackend {
    fn create_role(&mut self, spec: &RoleSpec) -> Result<String, String>;
    fn create_scratch_bucket(&mut self) -> Result<ScratchBucket, String>;
    fn upload_artifact(&mut self, path: &Path) -> Result<String, String>;
    fn create_job(&mut self, job: &JobDescriptor) -> Result<ProvisionedJob, String>;
    fn create_workflow(&mut self, name: &str, description: &str) -> Result<String, String>;
    fn create_trigger(&mut self, trigger: &TriggerDescriptor) -> Result<String, String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSpec {
    pub name_suffix: String,
    pub assumed_by: String,
    pub managed_policies: Vec<String>,
}

impl RoleSpec {
    pub fn glue_job_role() -> Self {
        Self {
            name_suffix: "GlueJobRole".to_string(),
            assumed_by: "glue.amazonaws.com".to_string(),
            managed_policies: vec![
                "service-role/AWSGlueServiceRole".to_string(),
                "AmazonS3FullAccess".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScratchBucket {
    pub name: String,
    pub reference: String,
    pub scratch_location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedJob {
    pub stable_name: String,
    pub reference: String,
}
