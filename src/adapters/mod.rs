// Adapters layer: concrete implementations for external systems.

#[cfg(feature = "mongodb-load")]
pub mod mongo;
pub mod postgres;
pub mod storage;
