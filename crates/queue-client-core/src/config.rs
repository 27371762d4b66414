//! Connection settings for a [`QueueClient`](crate::QueueClient).

use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, ConfigLoader, Region, SdkConfig};
use aws_sdk_sqs::config::Credentials;

pub const DEFAULT_REGION: &str = "eu-central-1";

/// ElasticMQ's default listener.
pub const LOCAL_ENDPOINT: &str = "http://localhost:9324";

pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything needed to build the connection handle: region, endpoint and
/// credentials, plus the timeout budget applied to every operation.
///
/// Retries are always disabled; a failed call is reported, never repeated.
///
/// # Example
///
/// ```no_run
/// use queue_client::{ClientConfig, QueueClient};
///
/// # async fn example() {
/// let config = ClientConfig::local("http://localhost:9324");
/// let client = QueueClient::connect(&config).await;
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub region: String,
    /// Overrides the service endpoint, for emulators and tests.
    pub endpoint: Option<String>,
    /// Static credentials. When absent the SDK's default provider chain
    /// (environment, profile, instance metadata) is used.
    pub credentials: Option<Credentials>,
    pub operation_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            credentials: None,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    /// Settings for a local emulator such as ElasticMQ or LocalStack, which
    /// accept any signature.
    pub fn local(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            credentials: Some(static_credentials()),
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn timeout_config(&self) -> TimeoutConfig {
        TimeoutConfig::builder()
            .connect_timeout(self.connect_timeout)
            .operation_timeout(self.operation_timeout)
            .build()
    }

    pub fn loader(&self) -> ConfigLoader {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .retry_config(RetryConfig::disabled())
            .timeout_config(self.timeout_config());

        if let Some(endpoint) = &self.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        if let Some(credentials) = &self.credentials {
            loader = loader.credentials_provider(credentials.clone());
        }

        loader
    }

    pub async fn load(&self) -> SdkConfig {
        log::debug!(
            "loading sdk config: region={} endpoint={}",
            self.region,
            self.endpoint.as_deref().unwrap_or("<default>")
        );
        self.loader().load().await
    }
}

/// Credentials accepted by local emulators.
pub fn static_credentials() -> Credentials {
    Credentials::new("test", "test", None, None, "static")
}
