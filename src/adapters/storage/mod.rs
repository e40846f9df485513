//! Storage Adapters
//!
//! Implementations of the SessionStore port for tracking checkout sessions.
//!
//! ## Available Adapters
//!
//! - **FileSessionStore** - Single JSON file on disk, atomically replaced on write
//! - **InMemorySessionStore** - Stores sessions in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileSessionStore, InMemorySessionStore};
//!
//! // Production: file-based storage
//! let store = FileSessionStore::new("./data/paymongo_sessions.json");
//!
//! // Testing: in-memory storage
//! let store = InMemorySessionStore::new();
//! ```

mod file_session_store;
mod in_memory_session_store;
mod session_map;

pub use file_session_store::FileSessionStore;
pub use in_memory_session_store::InMemorySessionStore;
