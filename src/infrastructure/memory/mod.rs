//! In-memory content store.
//!
//! Serves the repository traits from a JSON seed document. Used when the
//! service runs without a database (`CONTENT_FILE`) and by the test suite.

mod content_store;

pub use content_store::{ContentSeed, MemoryContentStore};
