//! Event publisher abstraction.

use async_trait::async_trait;

use crate::events::PublisherTopic;
use crate::result::AppResult;

/// Publishes serialized messages to a logical topic.
///
/// Implementations map the topic to a concrete transport channel. A
/// failure means the message was not handed to the transport.
#[async_trait]
pub trait EventPublisher: Send + Sync + std::fmt::Debug + 'static {
    /// Publish a message to the given topic.
    async fn publish(&self, topic: PublisherTopic, message: &str) -> AppResult<()>;

    /// Return the transport name (e.g., `"memory"`, `"redis"`).
    fn transport_name(&self) -> &'static str;
}
