pub mod registry;
pub mod validate;
pub mod versions;

pub use registry::{get_json_schema, EmbeddedSchema};
pub use validate::validate_schema_instance;
