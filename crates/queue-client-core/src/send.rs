use std::collections::HashMap;

use crate::client::QueueClient;
use crate::error::{Operation, RemoteError};
use crate::model::{Acknowledgment, OutgoingMessage, QueueUrl};

impl QueueClient {
    /// Publishes one message with its attributes.
    ///
    /// `delay_seconds` and attribute values go to the service as given; an
    /// out-of-range delay comes back as a [`RemoteError::Service`].
    ///
    /// Not idempotent: if the response is lost after the service enqueued the
    /// message, the caller sees an error even though the message was sent.
    pub async fn send_message(
        &self,
        queue_url: &QueueUrl,
        message: &OutgoingMessage,
    ) -> Result<Acknowledgment, RemoteError> {
        let attributes = message
            .attributes
            .iter()
            .map(|(name, value)| {
                value
                    .to_sdk()
                    .map(|v| (name.clone(), v))
                    .map_err(|e| RemoteError::Transport {
                        operation: Operation::SendMessage,
                        message: format!("failed to build attribute {}: {}", name, e),
                    })
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        log::debug!(
            "sending message to {} ({} attribute(s), delay {:?})",
            queue_url,
            attributes.len(),
            message.delay_seconds
        );

        let output = self
            .client
            .send_message()
            .queue_url(queue_url.as_str())
            .message_body(&message.body)
            .set_message_attributes((!attributes.is_empty()).then_some(attributes))
            .set_delay_seconds(message.delay_seconds)
            .send()
            .await
            .map_err(|e| {
                let err = RemoteError::from_sdk(Operation::SendMessage, e)
                    .for_queue(queue_url.as_str());
                log::warn!("send to {} failed: {}", queue_url, err);
                err
            })?;

        let message_id = output.message_id.ok_or(RemoteError::MalformedResponse {
            operation: Operation::SendMessage,
            field: "MessageId",
        })?;

        Ok(Acknowledgment {
            message_id,
            md5_of_body: output.md5_of_message_body,
        })
    }
}
