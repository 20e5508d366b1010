//! Service implementations
//!
//! Production implementations of the orchestrator's injected seams:
//! the record stores, the inbox signal source, and the GitHub
//! scaffolder.

pub mod scaffold;
pub mod scout;
pub mod store;

// Re-export all service implementations
pub use scaffold::GithubScaffolder;
pub use scout::InboxSignalSource;
pub use store::{JsonFileStore, MemoryStore};
