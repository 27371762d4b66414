use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use queue_client::{
    AttributeValue, ClientConfig, OutgoingMessage, QueueClient, QueueUrl, ReceiptHandle,
    ReceiveOptions, ReceivedMessage, DEFAULT_REGION, LOCAL_ENDPOINT,
};

mod demo;

#[tokio::main]
pub async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = Cli::parse().run().await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

#[derive(Debug, Parser)]
#[command(name = "queue-client")]
#[command(about = "list, send to and receive from SQS-compatible queues", long_about = None)]
pub struct Cli {
    /// Target region
    #[arg(long, global = true, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// Endpoint override for non-production testing
    #[arg(long, global = true, env = "AWS_ENDPOINT_URL")]
    endpoint: Option<String>,

    /// Use static test credentials; the endpoint defaults to http://localhost:9324
    #[arg(long, global = true, action)]
    local: bool,

    /// Timeout for each remote operation, in seconds
    #[arg(long, global = true, env = "QUEUE_CLIENT_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List queue URLs
    List {
        /// Only list queues whose name starts with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Resolve a queue name to its URL
    Url { name: String },
    /// Send one message
    Send {
        /// Queue URL, or a queue name to resolve
        queue: String,

        body: String,

        /// Message attribute as NAME[:TYPE]=VALUE, TYPE is String (default), Number or Binary
        #[arg(short, long = "attribute", value_parser = parse_attribute)]
        attributes: Vec<(String, AttributeValue)>,

        #[arg(long)]
        delay_seconds: Option<i32>,
    },
    /// Receive messages
    Receive {
        /// Queue URL, or a queue name to resolve
        queue: String,

        /// Seconds the received messages stay hidden from other consumers
        #[arg(long, default_value_t = 30)]
        visibility_timeout: i32,

        #[arg(long, default_value_t = 1)]
        max_messages: i32,

        /// Delete each message after printing it
        #[arg(long, action)]
        delete: bool,

        /// Print one JSON object per message
        #[arg(long, action)]
        json: bool,
    },
    /// Delete a received message by its receipt handle
    Delete {
        /// Queue URL, or a queue name to resolve
        queue: String,

        receipt_handle: String,
    },
    /// List queues, then send one message to a queue and receive it back
    Demo(DemoArgs),
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    #[arg(long, env = "QUEUE_NAME", default_value = "default")]
    pub queue_name: String,

    #[arg(long, default_value_t = 3)]
    pub visibility_timeout: i32,

    #[arg(long, default_value_t = 10)]
    pub delay_seconds: i32,

    /// Delete the received message
    #[arg(long, action)]
    pub acknowledge: bool,

    #[arg(long, action)]
    pub json: bool,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        let config = if self.local {
            ClientConfig::local(self.endpoint.as_deref().unwrap_or(LOCAL_ENDPOINT))
        } else {
            match &self.endpoint {
                Some(endpoint) => ClientConfig::default().with_endpoint(endpoint),
                None => ClientConfig::default(),
            }
        };

        config
            .with_region(&self.region)
            .with_operation_timeout(Duration::from_secs(self.timeout))
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let client = QueueClient::connect(&self.client_config()).await;

        match self.command {
            Commands::List { prefix } => {
                let queues = client
                    .list_queues_with_prefix(prefix.as_deref())
                    .await
                    .context("failed to retrieve queue URLs")?;
                for (i, url) in queues.iter().enumerate() {
                    println!("{}: {}", i, url);
                }
            }
            Commands::Url { name } => {
                let url = client
                    .resolve_queue_url(&name)
                    .await
                    .with_context(|| format!("failed to resolve queue {}", name))?;
                println!("{}", url);
            }
            Commands::Send {
                queue,
                body,
                attributes,
                delay_seconds,
            } => {
                let queue = target(&client, &queue).await?;
                let message = OutgoingMessage {
                    body,
                    attributes: attributes.into_iter().collect(),
                    delay_seconds,
                };
                let ack = client
                    .send_message(&queue, &message)
                    .await
                    .context("failed to send the message")?;
                println!("Sent message {} to queue {}", ack.message_id, queue);
            }
            Commands::Receive {
                queue,
                visibility_timeout,
                max_messages,
                delete,
                json,
            } => {
                let queue = target(&client, &queue).await?;
                let options =
                    ReceiveOptions::new(visibility_timeout).with_max_messages(max_messages);
                let messages = client
                    .receive_messages(&queue, options)
                    .await
                    .context("failed to receive messages")?;

                write_messages(&mut std::io::stdout().lock(), &messages, json)?;

                if delete {
                    for message in &messages {
                        client
                            .delete_message(&queue, &message.receipt_handle)
                            .await
                            .context("failed to delete the message")?;
                    }
                }
            }
            Commands::Delete {
                queue,
                receipt_handle,
            } => {
                let queue = target(&client, &queue).await?;
                client
                    .delete_message(&queue, &ReceiptHandle::new(receipt_handle))
                    .await
                    .context("failed to delete the message")?;
                println!("Deleted message from queue {}", queue);
            }
            Commands::Demo(args) => demo::run(&client, &args).await?,
        };

        Ok(())
    }
}

/// Anything with a scheme is taken as a queue URL, anything else as a name.
async fn target(client: &QueueClient, queue: &str) -> anyhow::Result<QueueUrl> {
    if queue.contains("://") {
        return Ok(QueueUrl::new(queue));
    }

    client
        .resolve_queue_url(queue)
        .await
        .with_context(|| format!("failed to resolve queue {}", queue))
}

/// Writes received messages, one JSON object per line with `json`, otherwise
/// as labelled lines. Nothing is written for an empty batch in JSON mode.
pub fn write_messages<W: Write>(
    out: &mut W,
    messages: &[ReceivedMessage],
    json: bool,
) -> anyhow::Result<()> {
    if json {
        for message in messages {
            writeln!(out, "{}", serde_json::to_string(message)?)?;
        }
        return Ok(());
    }

    if messages.is_empty() {
        writeln!(out, "No messages available")?;
    }

    for message in messages {
        writeln!(out, "Message ID:     {}", message.message_id)?;
        writeln!(out, "Message Handle: {}", message.receipt_handle)?;
        writeln!(out, "Body:           {}", message.body)?;
        for (name, value) in &message.attributes {
            match value {
                AttributeValue::String(v) | AttributeValue::Number(v) => {
                    writeln!(out, "Attribute:      {} ({}) = {}", name, value.data_type(), v)?
                }
                AttributeValue::Binary(v) => {
                    writeln!(out, "Attribute:      {} (Binary) = {} bytes", name, v.len())?
                }
            }
        }
    }

    Ok(())
}

fn parse_attribute(s: &str) -> Result<(String, AttributeValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME[:TYPE]=VALUE, got '{}'", s))?;

    let (name, data_type) = key.split_once(':').unwrap_or((key, "String"));
    if name.is_empty() {
        return Err(format!("attribute name is empty in '{}'", s));
    }

    let value = match data_type {
        "String" => AttributeValue::string(value),
        "Number" => AttributeValue::number(value),
        "Binary" => AttributeValue::binary(value.as_bytes()),
        other => {
            return Err(format!(
                "unknown attribute type '{}'. Allowed: String, Number, Binary",
                other
            ))
        }
    };

    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn attribute_defaults_to_string() {
        assert_eq!(
            parse_attribute("Title=The Whistler").unwrap(),
            ("Title".to_string(), AttributeValue::string("The Whistler"))
        );
    }

    #[test]
    fn attribute_with_type() {
        assert_eq!(
            parse_attribute("WeeksOn:Number=6").unwrap(),
            ("WeeksOn".to_string(), AttributeValue::number(6))
        );
        assert_eq!(
            parse_attribute("Raw:Binary=abc").unwrap(),
            ("Raw".to_string(), AttributeValue::binary(b"abc".to_vec()))
        );
    }

    #[test]
    fn attribute_value_may_contain_separators() {
        assert_eq!(
            parse_attribute("Url=http://example.com/?a=b").unwrap(),
            (
                "Url".to_string(),
                AttributeValue::string("http://example.com/?a=b")
            )
        );
    }

    #[test]
    fn malformed_attributes_are_rejected() {
        assert!(parse_attribute("no-separator").is_err());
        assert!(parse_attribute("=value").is_err());
        assert!(parse_attribute("Name:Date=2016-12-11").is_err());
    }

    fn local_cli(endpoint: Option<&str>) -> Cli {
        Cli {
            region: DEFAULT_REGION.to_string(),
            endpoint: endpoint.map(str::to_string),
            local: true,
            timeout: 30,
            command: Commands::List { prefix: None },
        }
    }

    fn sample_message() -> ReceivedMessage {
        ReceivedMessage {
            message_id: "id-1".to_string(),
            receipt_handle: ReceiptHandle::new("handle-1"),
            body: "hello".to_string(),
            attributes: [("WeeksOn".to_string(), AttributeValue::number(6))].into(),
            system_attributes: Default::default(),
        }
    }

    fn written(messages: &[ReceivedMessage], json: bool) -> String {
        let mut out = Vec::new();
        write_messages(&mut out, messages, json).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_batch_notice_is_human_only() {
        assert_eq!(written(&[], false), "No messages available\n");
        assert_eq!(written(&[], true), "");
    }

    #[test]
    fn json_output_is_one_object_per_line() {
        let out = written(&[sample_message(), sample_message()], true);

        assert_eq!(out.lines().count(), 2);
        for line in out.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["receipt_handle"], "handle-1");
        }
    }

    #[test]
    fn human_output_lists_attributes() {
        let out = written(&[sample_message()], false);

        assert!(out.contains("Message ID:     id-1"));
        assert!(out.contains("Message Handle: handle-1"));
        assert!(out.contains("Attribute:      WeeksOn (Number) = 6"));
        assert!(!out.contains("No messages available"));
    }

    #[test]
    fn local_flag_defaults_endpoint() {
        // built directly so AWS_ENDPOINT_URL in the environment cannot leak in
        let config = local_cli(None).client_config();

        assert_eq!(config.endpoint.as_deref(), Some(LOCAL_ENDPOINT));
        assert!(config.credentials.is_some());
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "queue-client",
            "list",
            "--region",
            "us-east-1",
            "--endpoint",
            "http://localhost:4566",
            "--timeout",
            "5",
        ])
        .unwrap();
        let config = cli.client_config();

        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.operation_timeout, Duration::from_secs(5));
        assert!(config.credentials.is_none());
    }

    #[test]
    fn demo_defaults() {
        let cli = Cli::try_parse_from(["queue-client", "demo"]).unwrap();

        let Commands::Demo(args) = cli.command else {
            panic!("expected the demo subcommand");
        };
        assert_eq!(args.visibility_timeout, 3);
        assert_eq!(args.delay_seconds, 10);
        assert!(!args.acknowledge);
    }
}
