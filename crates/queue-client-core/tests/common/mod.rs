use anyhow::Context;
use queue_client::{ClientConfig, QueueClient, QueueUrl};

/// Endpoint of an already running LocalStack; override with `LOCALSTACK_ENDPOINT`.
pub fn localstack_endpoint() -> String {
    std::env::var("LOCALSTACK_ENDPOINT").unwrap_or_else(|_| "http://localhost:4566".to_string())
}

pub async fn local_client() -> QueueClient {
    let config = ClientConfig::local(localstack_endpoint()).with_region("us-east-1");
    QueueClient::connect(&config).await
}

pub async fn create_or_get_queue_url(client: &QueueClient, queue_name: &str) -> QueueUrl {
    // create-queue returns the existing url when the queue already exists
    let output = client
        .client
        .create_queue()
        .queue_name(queue_name)
        .send()
        .await
        .with_context(|| format!("failed to create queue {queue_name}"))
        .unwrap();

    let queue_url = output
        .queue_url
        .with_context(|| "QueueUrl not found in response".to_string())
        .unwrap();

    // Purge the queue to remove any leftover messages from previous test runs
    let _ = client.client.purge_queue().queue_url(&queue_url).send().await;

    QueueUrl::new(queue_url)
}
