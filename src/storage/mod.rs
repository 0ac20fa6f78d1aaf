//! Storage backends for session documents.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use traits::{SessionStore, SessionSummary};
