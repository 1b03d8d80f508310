//! Storage backends implementing the `podium_core::storage` traits.

#[cfg(feature = "dynamodb")]
mod dynamodb;
#[cfg(feature = "inmemory")]
mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbRepository;
#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;
