pub mod adapters;
pub mod compliance;
pub mod error;
pub mod fingerprint;
pub mod json_util;
pub mod registry;
pub mod traits;

pub use compliance::enrich_finding_with_compliance;
pub use error::{Error, Result};
pub use fingerprint::fingerprint;
pub use registry::Registry;
pub use traits::AdapterPlugin;
