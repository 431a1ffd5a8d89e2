//! # usermgmt-events
//!
//! Implementations of [`EventPublisher`](usermgmt_core::traits::EventPublisher):
//!
//! - In-memory broadcast channels for single-node deployments and tests
//! - Redis `PUBLISH` for multi-node deployments (`redis-pubsub` feature)
//! - A dispatcher choosing between them from configuration

pub mod dispatch;
pub mod memory;
#[cfg(feature = "redis-pubsub")]
pub mod redis_publisher;

pub use dispatch::EventPublisherDispatch;
pub use memory::MemoryEventPublisher;
#[cfg(feature = "redis-pubsub")]
pub use redis_publisher::RedisEventPublisher;
