//! Publisher selection from configuration.

use async_trait::async_trait;
use tracing::info;

use usermgmt_core::config::events::{EventProvider, EventsConfig};
#[cfg(not(feature = "redis-pubsub"))]
use usermgmt_core::error::AppError;
use usermgmt_core::events::PublisherTopic;
use usermgmt_core::result::AppResult;
use usermgmt_core::traits::EventPublisher;

use crate::memory::MemoryEventPublisher;
#[cfg(feature = "redis-pubsub")]
use crate::redis_publisher::RedisEventPublisher;

/// Dispatcher over the available transports.
#[derive(Debug)]
pub enum EventPublisherDispatch {
    /// In-process broadcast (single node).
    Memory(MemoryEventPublisher),
    /// Redis pub/sub (multi-node).
    #[cfg(feature = "redis-pubsub")]
    Redis(RedisEventPublisher),
}

impl EventPublisherDispatch {
    /// Build the publisher named by `config.provider`.
    pub async fn from_config(config: &EventsConfig) -> AppResult<Self> {
        let publisher = match config.provider {
            EventProvider::Memory => Self::Memory(MemoryEventPublisher::new(
                config.topics.clone(),
                config.buffer_size,
            )),
            #[cfg(feature = "redis-pubsub")]
            EventProvider::Redis => Self::Redis(
                RedisEventPublisher::connect(&config.redis_url, config.topics.clone()).await?,
            ),
            #[cfg(not(feature = "redis-pubsub"))]
            EventProvider::Redis => {
                return Err(AppError::configuration(
                    "Redis event provider requires the `redis-pubsub` feature",
                ));
            }
        };
        info!(transport = publisher.transport_name(), "Event publisher initialized");
        Ok(publisher)
    }
}

#[async_trait]
impl EventPublisher for EventPublisherDispatch {
    async fn publish(&self, topic: PublisherTopic, message: &str) -> AppResult<()> {
        match self {
            Self::Memory(inner) => inner.publish(topic, message).await,
            #[cfg(feature = "redis-pubsub")]
            Self::Redis(inner) => inner.publish(topic, message).await,
        }
    }

    fn transport_name(&self) -> &'static str {
        match self {
            Self::Memory(inner) => inner.transport_name(),
            #[cfg(feature = "redis-pubsub")]
            Self::Redis(inner) => inner.transport_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider_from_default_config() {
        let publisher = EventPublisherDispatch::from_config(&EventsConfig::default())
            .await
            .unwrap();
        assert_eq!(publisher.transport_name(), "memory");
    }

    #[cfg(not(feature = "redis-pubsub"))]
    #[tokio::test]
    async fn test_redis_provider_requires_feature() {
        let config = EventsConfig {
            provider: EventProvider::Redis,
            ..EventsConfig::default()
        };
        assert!(EventPublisherDispatch::from_config(&config).await.is_err());
    }
}
