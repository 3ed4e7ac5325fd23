use crate::field_path::FieldPath;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredIssue {
    pub kind: String,
    pub severity: IssueSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub field_path: FieldPath,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<Value>,
}

impl StructuredIssue {
    pub fn new(
        kind: &str,
        severity: IssueSeverity,
        field_path: FieldPath,
        message: impl Into<String>,
        reference: &str,
    ) -> Self {
        Self {
            kind: kind.to_string(),
            severity,
            subject: None,
            field_path,
            message: message.into(),
            reference: Some(reference.to_string()),
            related: None,
        }
    }

    pub fn error(kind: &str, field_path: FieldPath, message: impl Into<String>, reference: &str) -> Self {
        Self::new(kind, IssueSeverity::Error, field_path, message, reference)
    }

    pub fn warning(kind: &str, field_path: FieldPath, message: impl Into<String>, reference: &str) -> Self {
        Self::new(kind, IssueSeverity::Warning, field_path, message, reference)
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_related(mut self, related: Value) -> Self {
        self.related = Some(related);
        self
    }

    pub fn with_file(mut self, path: &Path) -> Self {
        let file = Value::String(path.display().to_string());
        let mut object = match self.related.take() {
            Some(Value::Object(object)) => object,
            Some(other) => {
                let mut object = Map::new();
                object.insert("details".to_string(), other);
                object
            }
            None => Map::new(),
        };
        object.insert("file".to_string(), file);
        self.related = Some(Value::Object(object));
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }

    pub fn file(&self) -> Option<&str> {
        self.related
            .as_ref()
            .and_then(Value::as_object)
            .and_then(|object| object.get("file"))
            .and_then(Value::as_str)
    }

    pub fn sort_stable(issues: &mut [Self]) {
        issues.sort_by(|left, right| {
            (
                left.severity,
                &left.kind,
                left.file(),
                &left.subject,
                &left.field_path,
                &left.message,
            )
                .cmp(&(
                    right.severity,
                    &right.kind,
                    right.file(),
                    &right.subject,
                    &right.field_path,
                    &right.message,
                ))
        });
    }
}

impl Display for StructuredIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            IssueSeverity::Error => "error",
            IssueSeverity::Warning => "warning",
            IssueSeverity::Info => "info",
        };
        write!(f, "{severity}[{}]", self.reference.as_deref().unwrap_or(&self.kind))?;
        if let Some(file) = self.file() {
            write!(f, " {file}")?;
        }
        if let Some(subject) = &self.subject {
            write!(f, " ({subject})")?;
        }
        write!(f, " at {}: {}", self.field_path, self.message)
    }
}

pub fn has_errors(issues: &[StructuredIssue]) -> bool {
    issues.iter().any(StructuredIssue::is_error)
}

#[cfg(test)]
#[path = "issues_test.rs"]
mod tests;
