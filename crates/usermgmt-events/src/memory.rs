//! In-memory publisher for single-node deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use usermgmt_core::config::events::TopicNames;
use usermgmt_core::events::PublisherTopic;
use usermgmt_core::result::AppResult;
use usermgmt_core::traits::EventPublisher;

/// Broadcasts each message to every current subscriber of its topic.
///
/// Messages published while a topic has no subscribers are dropped.
#[derive(Debug)]
pub struct MemoryEventPublisher {
    /// Channel name → broadcast sender
    channels: RwLock<HashMap<String, broadcast::Sender<String>>>,
    topics: TopicNames,
    buffer_size: usize,
}

impl MemoryEventPublisher {
    /// Create a new in-memory publisher.
    pub fn new(topics: TopicNames, buffer_size: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            topics,
            buffer_size: buffer_size.max(1),
        }
    }

    /// Subscribe to a logical topic.
    pub async fn subscribe(&self, topic: PublisherTopic) -> broadcast::Receiver<String> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(self.topics.resolve(topic).to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);
        tx.subscribe()
    }
}

#[async_trait]
impl EventPublisher for MemoryEventPublisher {
    async fn publish(&self, topic: PublisherTopic, message: &str) -> AppResult<()> {
        let channel = self.topics.resolve(topic);
        let channels = self.channels.read().await;
        match channels.get(channel) {
            Some(tx) => {
                let delivered = tx.send(message.to_string()).unwrap_or(0);
                debug!(channel, delivered, "Published event");
            }
            None => debug!(channel, "No subscribers; event dropped"),
        }
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_message() {
        let publisher = MemoryEventPublisher::new(TopicNames::default(), 8);
        let mut rx = publisher.subscribe(PublisherTopic::AuditEventsRecording).await;

        publisher
            .publish(PublisherTopic::AuditEventsRecording, "{\"a\":1}")
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap(), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_topics_are_isolated() {
        let publisher = MemoryEventPublisher::new(TopicNames::default(), 8);
        let mut audit = publisher.subscribe(PublisherTopic::AuditEventsRecording).await;

        publisher
            .publish(PublisherTopic::NotificationRequests, "notify")
            .await
            .unwrap();

        assert!(audit.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let publisher = MemoryEventPublisher::new(TopicNames::default(), 8);
        assert!(
            publisher
                .publish(PublisherTopic::ApplicationRoleReporting, "x")
                .await
                .is_ok()
        );
    }
}
