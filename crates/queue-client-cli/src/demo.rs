use std::time::Duration;

use anyhow::Context;
use queue_client::{AttributeValue, OutgoingMessage, QueueClient, ReceiveOptions};

use crate::{write_messages, DemoArgs};

pub fn bestseller(delay_seconds: i32) -> OutgoingMessage {
    OutgoingMessage::new(
        "Information about current NY Times fiction bestseller for week of 12/11/2016.",
    )
    .with_attribute("Title", AttributeValue::string("The Whistler"))
    .with_attribute("Author", AttributeValue::string("John Grisham"))
    .with_attribute("WeeksOn", AttributeValue::number(6))
    .with_delay_seconds(delay_seconds)
}

/// list -> resolve -> send -> receive, stopping at the first failure.
pub async fn run(client: &QueueClient, args: &DemoArgs) -> anyhow::Result<()> {
    let queues = client
        .list_queues()
        .await
        .context("failed to retrieve queue URLs")?;

    for (i, url) in queues.iter().enumerate() {
        println!("{}: {}", i, url);
    }

    let queue = client
        .resolve_queue_url(&args.queue_name)
        .await
        .with_context(|| format!("failed to resolve queue {}", args.queue_name))?;

    let ack = client
        .send_message(&queue, &bestseller(args.delay_seconds))
        .await
        .context("failed to send the message")?;

    println!("Sent message {} to queue {}", ack.message_id, queue);

    if let Ok(delay) = u64::try_from(args.delay_seconds) {
        if delay > 0 {
            log::info!("waiting {}s for the message to become visible", delay);
            // one extra second covers the service's clock granularity
            tokio::time::sleep(Duration::from_secs(delay + 1)).await;
        }
    }

    let messages = client
        .receive_messages(&queue, ReceiveOptions::new(args.visibility_timeout))
        .await
        .context("failed to receive messages")?;

    write_messages(&mut std::io::stdout().lock(), &messages, args.json)?;

    if args.acknowledge {
        for message in &messages {
            client
                .delete_message(&queue, &message.receipt_handle)
                .await
                .context("failed to delete the message")?;
            if !args.json {
                println!("Deleted message {}", message.message_id);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bestseller_message() {
        let message = bestseller(10);

        assert_eq!(message.delay_seconds, Some(10));
        assert_eq!(
            message.body,
            "Information about current NY Times fiction bestseller for week of 12/11/2016."
        );
        assert_eq!(
            message.attributes.get("WeeksOn"),
            Some(&AttributeValue::Number("6".to_string()))
        );
        assert_eq!(
            message.attributes.get("Author"),
            Some(&AttributeValue::String("John Grisham".to_string()))
        );
        assert_eq!(message.attributes.len(), 3);
    }
}
