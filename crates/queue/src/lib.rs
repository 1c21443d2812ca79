//! Legacy transmission queue
//!
//! Paid search records are flattened into an upper-case JSON message and
//! published zlib-compressed to the `legacy_transmission` exchange.

mod amqp;
mod error;
mod message;

pub use amqp::AmqpTransmitter;
pub use error::QueueError;
pub use message::{compress_message, create_user_search_message};

use async_trait::async_trait;
use serde_json::{Map, Value};

#[async_trait]
pub trait LegacyTransmitter: Send + Sync {
    /// Publish one record. `Ok(false)` means there was nothing to send.
    async fn transmit(&self, record: &Map<String, Value>) -> Result<bool, QueueError>;
}
