// Application layer - use cases and orchestration.
// The service facade is the only write path into the ledger; the CLI
// (or any other client) never touches the repository directly.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use service::*;
