//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of the repository
//! traits using `aws-sdk-dynamodb`. The physical table carries the key
//! columns `PK`/`SK_GSI` plus the overloaded GSI (partition `SK_GSI`, sort
//! `GSI_SK`) and the points LSI (partition `PK`, sort `LSI`).

mod convert;
mod error;
mod repository;

pub use repository::DynamoDbRepository;
