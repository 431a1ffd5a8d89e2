//! Redis pub/sub publisher for multi-node deployments.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::info;

use usermgmt_core::config::events::TopicNames;
use usermgmt_core::error::{AppError, ErrorKind};
use usermgmt_core::events::PublisherTopic;
use usermgmt_core::result::AppResult;
use usermgmt_core::traits::EventPublisher;

/// Publishes events with Redis `PUBLISH`.
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: ConnectionManager,
    topics: TopicNames,
}

impl std::fmt::Debug for RedisEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisEventPublisher")
            .field("topics", &self.topics)
            .finish_non_exhaustive()
    }
}

impl RedisEventPublisher {
    /// Connect to Redis.
    pub async fn connect(url: &str, topics: TopicNames) -> AppResult<Self> {
        let client = redis::Client::open(url).map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to create Redis client", e)
        })?;
        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to connect to Redis", e)
        })?;
        info!("Redis event publisher connected");
        Ok(Self { conn, topics })
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, topic: PublisherTopic, message: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PUBLISH")
            .arg(self.topics.resolve(topic))
            .arg(message)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Redis PUBLISH failed", e)
            })?;
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "redis"
    }
}
