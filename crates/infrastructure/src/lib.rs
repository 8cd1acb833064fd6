//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_auth_provider;
mod http_object_store;
mod in_memory_auth_provider;
mod in_memory_listing_repository;
mod in_memory_object_store;
mod in_memory_profile_repository;
mod in_memory_saved_listing_repository;
mod postgres_errors;
mod postgres_listing_repository;
mod postgres_profile_repository;
mod postgres_saved_listing_repository;
mod redis_view_invalidator;
mod tracing_view_invalidator;

pub use http_auth_provider::HttpAuthProvider;
pub use http_object_store::HttpObjectStore;
pub use in_memory_auth_provider::InMemoryAuthProvider;
pub use in_memory_listing_repository::InMemoryListingRepository;
pub use in_memory_object_store::{InMemoryObjectStore, StoredObject};
pub use in_memory_profile_repository::InMemoryProfileRepository;
pub use in_memory_saved_listing_repository::InMemorySavedListingRepository;
pub use postgres_listing_repository::PostgresListingRepository;
pub use postgres_profile_repository::PostgresProfileRepository;
pub use postgres_saved_listing_repository::PostgresSavedListingRepository;
pub use redis_view_invalidator::RedisViewInvalidator;
pub use tracing_view_invalidator::TracingViewInvalidator;
