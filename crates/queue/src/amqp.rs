//! RabbitMQ publisher for the legacy transmission exchange.

use async_trait::async_trait;
use digital_register_core::{QueueSettings, LEGACY_TRANSMISSION_EXCHANGE};
use lapin::options::{
    BasicPublishOptions, ConfirmSelectOptions, ExchangeDeclareOptions, QueueBindOptions,
    QueueDeclareOptions,
};
use lapin::types::{AMQPValue, FieldTable, LongString, ShortString};
use lapin::uri::{AMQPUri, AMQPUserInfo};
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::error::QueueError;
use crate::message::{compress_message, create_user_search_message};
use crate::LegacyTransmitter;

const ROUTING_KEY: &str = LEGACY_TRANSMISSION_EXCHANGE;
const CONTENT_TYPE: &str = "application/json";
const COMPRESSION_HEADER: &str = "application/x-gzip";
const DEFAULT_AMQP_PORT: u16 = 5672;

/// Connects on first use and reconnects after a failed publish.
pub struct AmqpTransmitter {
    settings: QueueSettings,
    channel: Mutex<Option<(Connection, Channel)>>,
}

impl std::fmt::Debug for AmqpTransmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmqpTransmitter").field("settings", &self.settings).finish_non_exhaustive()
    }
}

impl AmqpTransmitter {
    #[must_use]
    pub fn new(settings: QueueSettings) -> Self {
        Self { settings, channel: Mutex::new(None) }
    }

    /// Broker address on vhost `/`, credentials kept out of URI parsing.
    ///
    /// `hostname` is `host` or `host:port`. Without a user id the client's
    /// default credentials apply.
    fn uri(&self) -> Result<AMQPUri, QueueError> {
        let s = &self.settings;
        let (host, port) = match s.hostname.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| QueueError::InvalidHost(s.hostname.clone()))?;
                (host, port)
            },
            None => (s.hostname.as_str(), DEFAULT_AMQP_PORT),
        };
        if host.is_empty() {
            return Err(QueueError::InvalidHost(s.hostname.clone()));
        }

        let mut uri = AMQPUri::default();
        uri.authority.host = host.to_owned();
        uri.authority.port = port;
        if !s.userid.is_empty() {
            uri.authority.userinfo =
                AMQPUserInfo { username: s.userid.clone(), password: s.password.clone() };
        }
        uri.vhost = "/".to_owned();
        Ok(uri)
    }

    /// Open a confirming channel with the exchange, queue and binding in place.
    ///
    /// The queue must exist before publishing or the broker drops the message.
    async fn connect(&self) -> Result<(Connection, Channel), QueueError> {
        tracing::info!(
            queue = %self.settings.queue,
            hostname = %self.settings.hostname,
            exchange = LEGACY_TRANSMISSION_EXCHANGE,
            "connecting to legacy transmission queue"
        );
        let connection = Connection::connect_uri(self.uri()?, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel.confirm_select(ConfirmSelectOptions::default()).await?;
        channel
            .exchange_declare(
                LEGACY_TRANSMISSION_EXCHANGE,
                ExchangeKind::Direct,
                ExchangeDeclareOptions { durable: true, ..ExchangeDeclareOptions::default() },
                FieldTable::default(),
            )
            .await?;
        channel
            .queue_declare(
                &self.settings.queue,
                QueueDeclareOptions { durable: true, ..QueueDeclareOptions::default() },
                FieldTable::default(),
            )
            .await?;
        channel
            .queue_bind(
                &self.settings.queue,
                LEGACY_TRANSMISSION_EXCHANGE,
                ROUTING_KEY,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await?;
        tracing::info!(queue = %self.settings.queue, "queue declared");
        Ok((connection, channel))
    }

    async fn publish(&self, channel: &Channel, payload: &[u8]) -> Result<(), QueueError> {
        let mut headers = FieldTable::default();
        headers.insert(
            ShortString::from("compression"),
            AMQPValue::LongString(LongString::from(COMPRESSION_HEADER)),
        );
        let properties = BasicProperties::default()
            .with_content_type(ShortString::from(CONTENT_TYPE))
            .with_content_encoding(ShortString::from("utf-8"))
            .with_headers(headers);

        let confirm = channel
            .basic_publish(
                LEGACY_TRANSMISSION_EXCHANGE,
                ROUTING_KEY,
                BasicPublishOptions::default(),
                payload,
                properties,
            )
            .await?
            .await?;
        if confirm.is_nack() {
            return Err(QueueError::Nack(LEGACY_TRANSMISSION_EXCHANGE.to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl LegacyTransmitter for AmqpTransmitter {
    async fn transmit(&self, record: &Map<String, Value>) -> Result<bool, QueueError> {
        if record.is_empty() {
            tracing::error!("empty user search record, nothing sent");
            return Ok(false);
        }
        let payload = compress_message(&create_user_search_message(record))?;

        let mut guard = self.channel.lock().await;
        if guard.as_ref().is_none_or(|(conn, _)| !conn.status().connected()) {
            *guard = Some(self.connect().await?);
        }
        let Some((_, channel)) = guard.as_ref() else {
            return Ok(false);
        };

        if let Err(e) = self.publish(channel, &payload).await {
            *guard = None;
            return Err(e);
        }
        tracing::info!(queue = %self.settings.queue, "legacy transmission sent");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(userid: &str) -> QueueSettings {
        QueueSettings {
            queue: "legacy".to_owned(),
            hostname: "rabbit:5672".to_owned(),
            userid: userid.to_owned(),
            password: "secret".to_owned(),
        }
    }

    #[test]
    fn test_uri_with_credentials() {
        let uri = AmqpTransmitter::new(settings("guest")).uri().unwrap();
        assert_eq!(uri.authority.host, "rabbit");
        assert_eq!(uri.authority.port, 5672);
        assert_eq!(uri.authority.userinfo.username, "guest");
        assert_eq!(uri.authority.userinfo.password, "secret");
        assert_eq!(uri.vhost, "/");
    }

    #[test]
    fn test_uri_keeps_reserved_characters_in_password() {
        let mut settings = settings("guest");
        settings.password = "p@ss/w#rd:%2f".to_owned();
        let uri = AmqpTransmitter::new(settings).uri().unwrap();
        assert_eq!(uri.authority.userinfo.password, "p@ss/w#rd:%2f");
        assert_eq!(uri.authority.host, "rabbit");
        assert_eq!(uri.authority.port, 5672);
        assert_eq!(uri.vhost, "/");
    }

    #[test]
    fn test_uri_without_credentials_uses_client_defaults() {
        let uri = AmqpTransmitter::new(settings("")).uri().unwrap();
        assert_eq!(uri.authority.userinfo.username, AMQPUserInfo::default().username);
        assert_eq!(uri.authority.host, "rabbit");
    }

    #[test]
    fn test_uri_default_port() {
        let mut settings = settings("guest");
        settings.hostname = "rabbit".to_owned();
        assert_eq!(AmqpTransmitter::new(settings).uri().unwrap().authority.port, 5672);
    }

    #[test]
    fn test_uri_rejects_bad_port() {
        let mut settings = settings("guest");
        settings.hostname = "rabbit:amqp".to_owned();
        assert!(matches!(AmqpTransmitter::new(settings).uri(), Err(QueueError::InvalidHost(_))));
    }

    #[test]
    fn test_debug_hides_password() {
        assert!(!format!("{:?}", AmqpTransmitter::new(settings("guest"))).contains("secret"));
    }

    #[tokio::test]
    async fn test_empty_record_is_not_sent() {
        let transmitter = AmqpTransmitter::new(settings("guest"));
        assert!(!transmitter.transmit(&Map::new()).await.unwrap());
    }
}
