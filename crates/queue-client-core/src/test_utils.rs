use testcontainers::ContainerAsync;
use testcontainers_modules::{
    localstack::LocalStack,
    testcontainers::{runners::AsyncRunner, ImageExt, TestcontainersError},
};

use crate::{ClientConfig, QueueClient, QueueUrl};

pub fn local_config(endpoint_url: &str) -> ClientConfig {
    ClientConfig::local(endpoint_url).with_region("us-east-1")
}

pub async fn local_client(endpoint_url: &str) -> QueueClient {
    let _ = env_logger::builder().is_test(true).try_init();
    QueueClient::connect(&local_config(endpoint_url)).await
}

pub async fn localstack() -> Result<(String, ContainerAsync<LocalStack>), TestcontainersError> {
    let request = LocalStack::default()
        .with_tag("latest")
        .with_env_var("SERVICES", "sqs")
        .with_env_var("SKIP_SSL_CERT_DOWNLOAD", "1");
    let container = request.start().await?;

    let host_ip = container.get_host().await?;
    let host_port = container.get_host_port_ipv4(4566).await?;
    let endpoint_url = format!("http://{host_ip}:{host_port}");

    Ok((endpoint_url, container))
}

/// Generate a unique queue name for testing, using a UUID suffix.
pub fn unique_queue_name(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Creates a queue through the raw SDK client; creation is not part of the
/// queue client's surface.
pub async fn create_queue(client: &QueueClient, name: &str) -> QueueUrl {
    let output = client
        .client
        .create_queue()
        .queue_name(name)
        .send()
        .await
        .expect("failed to create test queue");

    QueueUrl::new(output.queue_url.expect("QueueUrl not found in response"))
}
