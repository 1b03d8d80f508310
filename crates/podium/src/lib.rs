//! Repository layer for the podium rankings store.
//!
//! Implements the repository traits from `podium_core::storage` against
//! DynamoDB (`aws-sdk-dynamodb`) and against an in-memory emulation of the
//! physical table used in tests. All key construction and item
//! encoding/decoding is delegated to the codecs in `podium_core`.

pub mod config;
pub mod storage;

pub use config::Config;
#[cfg(feature = "dynamodb")]
pub use storage::DynamoDbRepository;
#[cfg(feature = "inmemory")]
pub use storage::InMemoryRepository;
