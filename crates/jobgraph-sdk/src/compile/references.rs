use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReferences {
    stable_names: BTreeMap<String, String>,
}

impl JobReferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, job_name: impl Into<String>, stable_name: impl Into<String>) {
        self.stable_names.insert(job_name.into(), stable_name.into());
    }

    pub fn resolve(&self, job_name: &str) -> Option<&str> {
        self.stable_names.get(job_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stable_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stable_names.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for JobReferences {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut references = JobReferences::new();
        for (job_name, stable_name) in iter {
            references.insert(job_name, stable_name);
        }
        references
    }
}
