use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("AMQP error: {0}")]
    Amqp(#[from] lapin::Error),
    #[error("invalid OUTGOING_QUEUE_HOSTNAME: {0}")]
    InvalidHost(String),
    #[error("broker rejected message for exchange {0}")]
    Nack(String),
    #[error("message serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("message compression failed: {0}")]
    Compression(#[from] std::io::Error),
}
