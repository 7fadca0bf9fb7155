//! In-memory storage backend.
//!
//! Both tables live in HashMaps wrapped in `Arc<RwLock<_>>`. Useful for
//! development and router tests where persistence is not required.

mod repository;

pub use repository::InMemoryRepository;
