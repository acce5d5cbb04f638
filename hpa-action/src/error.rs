//! HPA action controller error abstractions.

pub use hpa_core::AppError;

/// A result type used with the gRPC system.
pub type RpcResult<T> = ::std::result::Result<T, tonic::Status>;
