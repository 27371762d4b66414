//! # queue-client-core
//!
//! A thin, typed client for SQS-compatible message queues.
//!
//! This crate wraps the handful of remote operations a producer or consumer
//! needs behind [`QueueClient`]: listing queues, resolving a queue name to its
//! URL, sending a message with typed attributes, receiving messages with a
//! visibility timeout and deleting a received message.
//!
//! ## Features
//!
//! - **Queue Discovery**: List queues (optionally by name prefix) and resolve names to URLs
//! - **Sending**: Publish one message with typed attributes and an optional delay
//! - **Receiving**: Receive messages with their user and system attributes
//! - **Acknowledging**: Delete a delivery through its receipt handle
//!
//! Nothing is validated, cached or retried on the client side. Every failure
//! is a [`RemoteError`], and every operation is bounded by the timeout budget
//! in [`ClientConfig`].
//!
//! ## Example
//!
//! ```no_run
//! use queue_client::{AttributeValue, ClientConfig, OutgoingMessage, QueueClient, ReceiveOptions};
//!
//! # async fn example() -> Result<(), queue_client::RemoteError> {
//! let client = QueueClient::connect(&ClientConfig::local("http://localhost:9324")).await;
//!
//! let queue = client.resolve_queue_url("default").await?;
//!
//! let message = OutgoingMessage::new("hello")
//!     .with_attribute("Author", AttributeValue::string("John Grisham"));
//! client.send_message(&queue, &message).await?;
//!
//! for received in client.receive_messages(&queue, ReceiveOptions::new(3)).await? {
//!     println!("{}", received.body);
//!     client.delete_message(&queue, &received.receipt_handle).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod model;
mod send;

#[cfg(test)]
mod test_utils;

pub use client::QueueClient;
pub use config::{
    static_credentials, ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_OPERATION_TIMEOUT,
    DEFAULT_REGION, LOCAL_ENDPOINT,
};
pub use error::{Operation, RemoteError};
pub use model::{
    Acknowledgment, AttributeValue, OutgoingMessage, QueueUrl, ReceiptHandle, ReceiveOptions,
    ReceivedMessage,
};
