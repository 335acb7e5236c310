// Storage layer for the llmhub control-plane
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// - Database: sqlx repository over the llm_settings and models tables
// - InMemoryDatabase: the same API over RwLock-guarded Vecs
// - StorageBackend: enum dispatch between the two
// - EncryptionService: at-rest encryption of provider API keys

pub mod backend;
pub mod encryption;
pub mod memory;
pub mod models;
pub mod repositories;

pub use backend::StorageBackend;
pub use encryption::{generate_encryption_key, EncryptionService, ENCRYPTED_PREFIX};
pub use memory::InMemoryDatabase;
pub use models::*;
pub use repositories::*;
