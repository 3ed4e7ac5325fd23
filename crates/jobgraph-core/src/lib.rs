pub mod field_path;
pub mod fingerprint;
pub mod issues;
pub mod merge;
pub mod naming;

pub use field_path::{FieldPath, FieldPathSegment};
pub use fingerprint::{canonical_json_bytes, fingerprint_hex, FingerprintOptions};
pub use issues::{has_errors, IssueSeverity, StructuredIssue};
pub use merge::{deep_merge, deep_merge_maps};
pub use naming::normalize_identifier;
