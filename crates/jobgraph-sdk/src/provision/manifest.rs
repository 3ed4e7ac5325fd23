use super::{ProvisionedJob, ProvisioningBackend, RoleSpec, ScratchBucket};
use crate::descriptors::{workflow_logical_id, JobDescriptor, TriggerDescriptor};
use jobgraph_core::{fingerprint_hex, FingerprintOptions};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info};

pub const MANIFEST_SCHEMA_0_0_1: &str = "jobgraph-manifest/0.0.1";

const ROLE_LOGICAL_ID: &str = "GlueJobRole";
const BUCKET_LOGICAL_ID: &str = "GlueScriptsBucket";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestBackendOptions {
    pub stack_name: String,
    /// Literal account id; the role reference keeps a placeholder when unset.
    pub account: Option<String>,
    pub region: String,
    pub assets_bucket: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManifestResource {
    pub logical_id: String,
    #[serde(rename = "Type")]
    pub resource_type: String,
    pub properties: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestAsset {
    pub source: String,
    pub sha256: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentManifest {
    pub schema: String,
    pub stack_name: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    pub resources: Vec<ManifestResource>,
    pub assets: Vec<ManifestAsset>,
    pub fingerprint: String,
}

#[derive(Debug, Clone)]
pub struct ManifestBackend {
    options: ManifestBackendOptions,
    resources: Vec<ManifestResource>,
    logical_ids: BTreeSet<String>,
    assets: BTreeMap<String, ManifestAsset>,
    job_logical_ids: BTreeMap<String, String>,
}

impl ManifestBackend {
    pub fn new(options: ManifestBackendOptions) -> Self {
        Self {
            options,
            resources: Vec::new(),
            logical_ids: BTreeSet::new(),
            assets: BTreeMap::new(),
            job_logical_ids: BTreeMap::new(),
        }
    }

    pub fn options(&self) -> &ManifestBackendOptions {
        &self.options
    }

    pub fn resources(&self) -> &[ManifestResource] {
        &self.resources
    }

    pub fn manifest(&self) -> Result<DeploymentManifest, String> {
        let resources = self.resources.clone();
        let assets = self.assets.values().cloned().collect::<Vec<_>>();
        let fingerprint = fingerprint_hex(
            &json!({ "resources": &resources, "assets": &assets }),
            &FingerprintOptions::default(),
        )
        .map_err(|error| format!("manifest fingerprint failed: {error}"))?;
        Ok(DeploymentManifest {
            schema: MANIFEST_SCHEMA_0_0_1.to_string(),
            stack_name: self.options.stack_name.clone(),
            region: self.options.region.clone(),
            account: self.options.account.clone(),
            resources,
            assets,
            fingerprint,
        })
    }

    fn record(
        &mut self,
        logical_id: String,
        resource_type: &str,
        properties: Value,
        depends_on: Vec<String>,
    ) -> Result<(), String> {
        if !self.logical_ids.insert(logical_id.clone()) {
            return Err(format!("logical id `{logical_id}` is already used by another resource"));
        }
        debug!(logical_id = %logical_id, resource_type, "recorded resource");
        self.resources.push(ManifestResource {
            logical_id,
            resource_type: resource_type.to_string(),
            properties,
            depends_on,
        });
        Ok(())
    }

    fn account_reference(&self) -> &str {
        self.options.account.as_deref().unwrap_or("${AWS::AccountId}")
    }
}

impl ProvisioningBackend for ManifestBackend {
    fn create_role(&mut self, spec: &RoleSpec) -> Result<String, String> {
        let role_name = format!("{}-{}", self.options.stack_name, spec.name_suffix);
        let policy_arns = spec
            .managed_policies
            .iter()
            .map(|policy| format!("arn:aws:iam::aws:policy/{policy}"))
            .collect::<Vec<_>>();
        let properties = json!({
            "RoleName": role_name,
            "AssumeRolePolicyDocument": {
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": { "Service": spec.assumed_by },
                    "Action": "sts:AssumeRole"
                }]
            },
            "ManagedPolicyArns": policy_arns,
        });
        self.record(ROLE_LOGICAL_ID.to_string(), "AWS::IAM::Role", properties, Vec::new())?;
        Ok(format!("arn:aws:iam::{}:role/{role_name}", self.account_reference()))
    }

    fn create_scratch_bucket(&mut self) -> Result<ScratchBucket, String> {
        let name = format!(
            "{}-glue-scripts-{}",
            self.options.stack_name.to_ascii_lowercase(),
            self.options.region
        );
        self.record(
            BUCKET_LOGICAL_ID.to_string(),
            "AWS::S3::Bucket",
            json!({ "BucketName": name }),
            Vec::new(),
        )?;
        Ok(ScratchBucket {
            reference: format!("arn:aws:s3:::{name}"),
            scratch_location: format!("s3://{name}/temporary/"),
            name,
        })
    }

    fn upload_artifact(&mut self, path: &Path) -> Result<String, String> {
        let bytes = std::fs::read(path)
            .map_err(|error| format!("failed to read artifact {}: {error}", path.display()))?;
        let sha256 = format!("{:x}", Sha256::digest(&bytes));
        let uri = format!("s3://{}/assets/{sha256}.py", self.options.assets_bucket);
        self.assets.entry(sha256.clone()).or_insert_with(|| ManifestAsset {
            source: path.display().to_string(),
            sha256,
            uri: uri.clone(),
        });
        debug!(path = %path.display(), uri = %uri, "staged artifact");
        Ok(uri)
    }

    fn create_job(&mut self, job: &JobDescriptor) -> Result<ProvisionedJob, String> {
        let properties = serde_json::to_value(job)
            .map_err(|error| format!("failed to encode job `{}`: {error}", job.name))?;
        self.record(
            job.logical_id.clone(),
            "AWS::Glue::Job",
            properties,
            vec![ROLE_LOGICAL_ID.to_string()],
        )?;
        self.job_logical_ids.insert(job.name.clone(), job.logical_id.clone());
        info!(job = %job.name, logical_id = %job.logical_id, "created job");
        Ok(ProvisionedJob {
            stable_name: job.name.clone(),
            reference: job.name.clone(),
        })
    }

    fn create_workflow(&mut self, name: &str, description: &str) -> Result<String, String> {
        self.record(
            workflow_logical_id(name),
            "AWS::Glue::Workflow",
            json!({ "Name": name, "Description": description }),
            Vec::new(),
        )?;
        info!(workflow = %name, "created workflow");
        Ok(name.to_string())
    }

    fn create_trigger(&mut self, trigger: &TriggerDescriptor) -> Result<String, String> {
        let properties = serde_json::to_value(trigger)
            .map_err(|error| format!("failed to encode trigger `{}`: {error}", trigger.name))?;

        let mut depends_on = vec![workflow_logical_id(&trigger.workflow_name)];
        let condition_jobs = trigger
            .activation
            .predicate()
            .map(|predicate| predicate.conditions.iter().map(|condition| condition.job_name.as_str()))
            .into_iter()
            .flatten();
        let action_jobs = trigger.actions.iter().map(|action| action.job_name.as_str());
        for job_name in action_jobs.chain(condition_jobs) {
            if let Some(logical_id) = self.job_logical_ids.get(job_name) {
                if !depends_on.contains(logical_id) {
                    depends_on.push(logical_id.clone());
                }
            }
        }

        self.record(trigger.logical_id.clone(), "AWS::Glue::Trigger", properties, depends_on)?;
        info!(
            workflow = %trigger.workflow_name,
            trigger = %trigger.name,
            trigger_type = ?trigger.trigger_type(),
            "created trigger"
        );
        Ok(trigger.name.clone())
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
