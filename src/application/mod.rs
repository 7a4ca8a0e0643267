// Application layer - use cases and orchestration.
// The service is the only way the CLI (or any other client) mutates the
// ledger; reporting builds read-only views on top of it.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
