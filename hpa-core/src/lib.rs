pub mod error;
pub mod model;
pub mod store;

pub use error::AppError;

/// The separator between the base name and the kind of a resource name in the app context,
/// as in `my-workload+Deployment`.
pub const RESOURCE_NAME_SEPARATOR: &str = "+";
