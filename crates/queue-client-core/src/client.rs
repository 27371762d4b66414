//! SQS client wrapper: queue discovery, receiving and acknowledging messages.

use aws_config::SdkConfig;
use aws_sdk_sqs as sqs;
use sqs::operation::get_queue_url::GetQueueUrlError;
use sqs::types::MessageSystemAttributeName;

use crate::config::ClientConfig;
use crate::error::{Operation, RemoteError};
use crate::model::{QueueUrl, ReceiptHandle, ReceiveOptions, ReceivedMessage};

/// Largest page `ListQueues` accepts.
const LIST_PAGE_SIZE: i32 = 1000;

/// Client for an SQS-compatible queue service.
///
/// Every method is one request/response exchange (list follows pagination
/// tokens) and returns the service's verdict unmodified: nothing is
/// validated, cached or retried locally.
///
/// The client is cheap to clone and may be shared between tasks.
///
/// # Example
///
/// ```no_run
/// use queue_client::{ClientConfig, QueueClient, ReceiveOptions};
///
/// # async fn example() -> Result<(), queue_client::RemoteError> {
/// let client = QueueClient::connect(&ClientConfig::local("http://localhost:9324")).await;
///
/// let queue = client.resolve_queue_url("default").await?;
/// for message in client.receive_messages(&queue, ReceiveOptions::new(3)).await? {
///     println!("{}: {}", message.message_id, message.body);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct QueueClient {
    /// The SQS client instance
    pub client: sqs::Client,
}

impl QueueClient {
    /// Creates a QueueClient from a pre-built AWS SDK config.
    ///
    /// Use this when the caller already owns an [`SdkConfig`]; timeouts and
    /// retry behavior are whatever that config says.
    pub fn from_config(config: &SdkConfig) -> Self {
        Self {
            client: sqs::Client::new(config),
        }
    }

    /// Builds the connection handle described by `config`.
    pub async fn connect(config: &ClientConfig) -> Self {
        Self::from_config(&config.load().await)
    }

    /// Lists every queue URL visible to the configured credentials and region.
    ///
    /// Handles pagination automatically, returning all queues regardless of count.
    ///
    /// # Errors
    ///
    /// Returns the first [`RemoteError`] any page request produces.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use queue_client::{ClientConfig, QueueClient};
    ///
    /// # async fn example() -> Result<(), queue_client::RemoteError> {
    /// let client = QueueClient::connect(&ClientConfig::default()).await;
    ///
    /// for (i, url) in client.list_queues().await?.iter().enumerate() {
    ///     println!("{}: {}", i, url);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_queues(&self) -> Result<Vec<QueueUrl>, RemoteError> {
        self.list_queues_with_prefix(None).await
    }

    /// Lists queue URLs whose queue name starts with `prefix`.
    pub async fn list_queues_with_prefix(
        &self,
        prefix: Option<&str>,
    ) -> Result<Vec<QueueUrl>, RemoteError> {
        let mut queues = Vec::new();
        let mut next_token = None;

        loop {
            log::debug!(
                "listing queues (prefix: {:?}, page token: {:?})",
                prefix,
                next_token
            );

            let output = self
                .client
                .list_queues()
                .set_queue_name_prefix(prefix.map(str::to_string))
                // without MaxResults the service never returns a NextToken
                .max_results(LIST_PAGE_SIZE)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|e| RemoteError::from_sdk(Operation::ListQueues, e))?;

            if let Some(list) = output.queue_urls {
                queues.extend(list.into_iter().map(QueueUrl::from));
            }

            next_token = output.next_token;
            if next_token.is_none() {
                break;
            }
        }

        log::debug!("found {} queue(s)", queues.len());
        Ok(queues)
    }

    /// Resolves a queue name to its URL in the configured account and region.
    ///
    /// Every call is a round trip; nothing is cached.
    ///
    /// # Errors
    ///
    /// [`RemoteError::NotFound`] when no queue has that name, otherwise
    /// whatever the service or transport reported.
    pub async fn resolve_queue_url(&self, queue_name: &str) -> Result<QueueUrl, RemoteError> {
        log::debug!("resolving queue url for {}", queue_name);

        let output = self
            .client
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await
            .map_err(|e| {
                if e
                    .as_service_error()
                    .is_some_and(GetQueueUrlError::is_queue_does_not_exist)
                {
                    return RemoteError::NotFound {
                        queue: queue_name.to_string(),
                    };
                }
                RemoteError::from_sdk(Operation::GetQueueUrl, e).for_queue(queue_name)
            })?;

        output
            .queue_url
            .map(QueueUrl::from)
            .ok_or(RemoteError::MalformedResponse {
                operation: Operation::GetQueueUrl,
                field: "QueueUrl",
            })
    }

    /// Receives up to `options.max_messages` messages from a queue.
    ///
    /// All user attributes and all system attributes are requested. Returned
    /// messages are hidden from other receivers for
    /// `options.visibility_timeout_seconds`; if they are not deleted before
    /// then they become deliverable again. No ordering is guaranteed.
    ///
    /// An empty queue is not an error: the result is simply empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the SQS API call fails, or if the service returns
    /// a message without an id or receipt handle.
    pub async fn receive_messages(
        &self,
        queue_url: &QueueUrl,
        options: ReceiveOptions,
    ) -> Result<Vec<ReceivedMessage>, RemoteError> {
        log::debug!(
            "receiving up to {} message(s) from {} (visibility timeout {}s)",
            options.max_messages,
            queue_url,
            options.visibility_timeout_seconds
        );

        let output = self
            .client
            .receive_message()
            .queue_url(queue_url.as_str())
            .max_number_of_messages(options.max_messages)
            .visibility_timeout(options.visibility_timeout_seconds)
            .message_attribute_names("All")
            .message_system_attribute_names(MessageSystemAttributeName::All)
            .send()
            .await
            .map_err(|e| {
                RemoteError::from_sdk(Operation::ReceiveMessage, e).for_queue(queue_url.as_str())
            })?;

        // absent and empty both mean nothing was visible at poll time
        output
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| {
                ReceivedMessage::from_sdk(m).map_err(|field| RemoteError::MalformedResponse {
                    operation: Operation::ReceiveMessage,
                    field,
                })
            })
            .collect()
    }

    /// Deletes a received message, acknowledging that delivery.
    ///
    /// # Arguments
    ///
    /// * `queue_url` - The queue the message was received from
    /// * `receipt_handle` - The receipt handle from when the message was received
    pub async fn delete_message(
        &self,
        queue_url: &QueueUrl,
        receipt_handle: &ReceiptHandle,
    ) -> Result<(), RemoteError> {
        log::debug!("deleting message from {}", queue_url);

        self.client
            .delete_message()
            .queue_url(queue_url.as_str())
            .receipt_handle(receipt_handle.as_str())
            .send()
            .await
            .map_err(|e| {
                RemoteError::from_sdk(Operation::DeleteMessage, e).for_queue(queue_url.as_str())
            })?;

        Ok(())
    }
}
