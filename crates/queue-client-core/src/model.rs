//! Queue references and the messages that travel through them.

use std::collections::BTreeMap;
use std::fmt;

use aws_sdk_sqs::error::BuildError;
use aws_sdk_sqs::primitives::Blob;
use aws_sdk_sqs::types::{Message, MessageAttributeValue};

/// URL identifying one queue, as returned by the service.
///
/// The client never inspects or rewrites it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct QueueUrl(String);

impl QueueUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueueUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for QueueUrl {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl From<&str> for QueueUrl {
    fn from(url: &str) -> Self {
        Self(url.to_string())
    }
}

/// Token granted by a receive, needed to acknowledge that delivery.
///
/// Opaque: it is only ever handed back to the service verbatim.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ReceiptHandle(String);

impl ReceiptHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A typed message attribute.
///
/// Custom type labels (`Number.float`, `String.json`) collapse to their base
/// type when received.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "data_type", content = "value")]
pub enum AttributeValue {
    String(String),
    Number(String),
    Binary(Vec<u8>),
}

impl AttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        AttributeValue::String(value.into())
    }

    /// Numbers travel as text; the service checks the format, not the client.
    pub fn number(value: impl ToString) -> Self {
        AttributeValue::Number(value.to_string())
    }

    pub fn binary(value: impl Into<Vec<u8>>) -> Self {
        AttributeValue::Binary(value.into())
    }

    pub fn data_type(&self) -> &'static str {
        match self {
            AttributeValue::String(_) => "String",
            AttributeValue::Number(_) => "Number",
            AttributeValue::Binary(_) => "Binary",
        }
    }

    pub(crate) fn to_sdk(&self) -> Result<MessageAttributeValue, BuildError> {
        let builder = MessageAttributeValue::builder().data_type(self.data_type());
        let builder = match self {
            AttributeValue::String(value) | AttributeValue::Number(value) => {
                builder.string_value(value)
            }
            AttributeValue::Binary(value) => builder.binary_value(Blob::new(value.clone())),
        };
        builder.build()
    }

    pub(crate) fn from_sdk(value: &MessageAttributeValue) -> Self {
        let text = || value.string_value().unwrap_or_default().to_string();
        let data_type = value.data_type();

        if data_type.starts_with("Binary") {
            AttributeValue::Binary(
                value
                    .binary_value()
                    .map(|blob| blob.as_ref().to_vec())
                    .unwrap_or_default(),
            )
        } else if data_type.starts_with("Number") {
            AttributeValue::Number(text())
        } else {
            AttributeValue::String(text())
        }
    }
}

/// A message to publish.
///
/// ```
/// use queue_client::{AttributeValue, OutgoingMessage};
///
/// let message = OutgoingMessage::new("hello")
///     .with_attribute("Author", AttributeValue::string("John Grisham"))
///     .with_delay_seconds(10);
///
/// assert_eq!(message.delay_seconds, Some(10));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub body: String,
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Seconds before the message becomes visible. Range checked remotely.
    pub delay_seconds: Option<i32>,
}

impl OutgoingMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_delay_seconds(mut self, seconds: i32) -> Self {
        self.delay_seconds = Some(seconds);
        self
    }
}

/// What the service hands back after accepting a message.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Acknowledgment {
    pub message_id: String,
    pub md5_of_body: Option<String>,
}

/// Per-call receive parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceiveOptions {
    /// Seconds the returned messages stay hidden from other receivers.
    pub visibility_timeout_seconds: i32,
    pub max_messages: i32,
}

impl ReceiveOptions {
    pub fn new(visibility_timeout_seconds: i32) -> Self {
        Self {
            visibility_timeout_seconds,
            max_messages: 1,
        }
    }

    pub fn with_max_messages(mut self, max_messages: i32) -> Self {
        self.max_messages = max_messages;
        self
    }
}

/// A delivered message.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ReceivedMessage {
    pub message_id: String,
    pub receipt_handle: ReceiptHandle,
    pub body: String,
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Service-maintained attributes such as `SentTimestamp`.
    pub system_attributes: BTreeMap<String, String>,
}

impl ReceivedMessage {
    /// Converts an SDK message, naming the first required field that is absent.
    pub(crate) fn from_sdk(message: Message) -> Result<Self, &'static str> {
        let message_id = message.message_id.ok_or("MessageId")?;
        let receipt_handle = message.receipt_handle.ok_or("ReceiptHandle")?;

        let attributes = message
            .message_attributes
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| (name, AttributeValue::from_sdk(&value)))
            .collect();

        let system_attributes = message
            .attributes
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| (name.as_str().to_string(), value))
            .collect();

        Ok(Self {
            message_id,
            receipt_handle: ReceiptHandle(receipt_handle),
            body: message.body.unwrap_or_default(),
            attributes,
            system_attributes,
        })
    }
}
