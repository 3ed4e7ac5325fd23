use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldPathSegment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldPath {
    segments: Vec<FieldPathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    pub fn from_segments(segments: Vec<FieldPathSegment>) -> Self {
        Self { segments }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self::root().with_key(key)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(FieldPathSegment::Key(key.into()));
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.segments.push(FieldPathSegment::Index(index));
        self
    }

    pub fn segments(&self) -> &[FieldPathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn from_json_pointer(pointer: &str) -> Self {
        let segments = pointer
            .split('/')
            .filter(|token| !token.is_empty())
            .map(|token| token.replace("~1", "/").replace("~0", "~"))
            .map(|token| match token.parse::<usize>() {
                Ok(index) => FieldPathSegment::Index(index),
                Err(_) => FieldPathSegment::Key(token),
            })
            .collect();
        Self { segments }
    }
}

impl Default for FieldPath {
    fn default() -> Self {
        Self::root()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                FieldPathSegment::Key(key) => write!(f, ".{key}")?,
                FieldPathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "field_path_test.rs"]
mod tests;
