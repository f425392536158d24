pub mod config;
pub mod enrichment;
pub mod pipeline;
pub mod schema;
pub mod walker;

pub use config::Config;
pub use pipeline::gather_results;
pub use schema::{validate_all, validate_finding, ValidationError, FINDING_SCHEMA_JSON};
pub use walker::{discover, WorkUnit};
