//! Error taxonomy for remote queue operations.

use std::fmt;

use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

/// Error codes the service uses for a queue that does not exist, depending on
/// whether it speaks the JSON or the query protocol.
const MISSING_QUEUE_CODES: [&str; 2] = [
    "AWS.SimpleQueueService.NonExistentQueue",
    "QueueDoesNotExist",
];

/// The remote call an error originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    ListQueues,
    GetQueueUrl,
    SendMessage,
    ReceiveMessage,
    DeleteMessage,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListQueues => "ListQueues",
            Operation::GetQueueUrl => "GetQueueUrl",
            Operation::SendMessage => "SendMessage",
            Operation::ReceiveMessage => "ReceiveMessage",
            Operation::DeleteMessage => "DeleteMessage",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the remote side (or the transport in front of it) can report.
///
/// The client never validates locally, so every failure a caller sees is one
/// of these. No variant is retried.
#[derive(Debug)]
pub enum RemoteError {
    /// The named queue (or the queue behind a URL) does not exist.
    NotFound { queue: String },
    /// The service received the request and rejected it.
    Service {
        operation: Operation,
        code: Option<String>,
        message: String,
    },
    /// The operation did not complete within the configured timeout budget.
    Timeout { operation: Operation },
    /// The request never produced a service response: connection refused,
    /// DNS failure, unparseable response, request construction failure.
    Transport { operation: Operation, message: String },
    /// A successful response was missing a field the client relies on.
    MalformedResponse {
        operation: Operation,
        field: &'static str,
    },
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RemoteError::Timeout { .. })
    }

    pub fn operation(&self) -> Option<Operation> {
        match self {
            RemoteError::NotFound { .. } => None,
            RemoteError::Service { operation, .. }
            | RemoteError::Timeout { operation }
            | RemoteError::Transport { operation, .. }
            | RemoteError::MalformedResponse { operation, .. } => Some(*operation),
        }
    }

    pub(crate) fn from_sdk<E, R>(operation: Operation, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: fmt::Debug,
    {
        match &err {
            SdkError::ServiceError(context) => {
                let service = context.err();
                RemoteError::Service {
                    operation,
                    code: service.code().map(str::to_owned),
                    message: service
                        .message()
                        .map(str::to_owned)
                        .unwrap_or_else(|| service.to_string()),
                }
            }
            SdkError::TimeoutError(_) => RemoteError::Timeout { operation },
            _ => RemoteError::Transport {
                operation,
                message: DisplayErrorContext(&err).to_string(),
            },
        }
    }

    /// Reclassifies a service rejection as [`RemoteError::NotFound`] when the
    /// error code says the target queue does not exist.
    pub(crate) fn for_queue(self, queue: &str) -> Self {
        let missing = match &self {
            RemoteError::Service {
                code: Some(code), ..
            } => MISSING_QUEUE_CODES.contains(&code.as_str()),
            _ => false,
        };

        if missing {
            RemoteError::NotFound {
                queue: queue.to_string(),
            }
        } else {
            self
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::NotFound { queue } => write!(f, "queue does not exist: {}", queue),
            RemoteError::Service {
                operation,
                code: Some(code),
                message,
            } => write!(f, "{} rejected by service ({}): {}", operation, code, message),
            RemoteError::Service {
                operation,
                code: None,
                message,
            } => write!(f, "{} rejected by service: {}", operation, message),
            RemoteError::Timeout { operation } => write!(f, "{} timed out", operation),
            RemoteError::Transport { operation, message } => {
                write!(f, "{} failed: {}", operation, message)
            }
            RemoteError::MalformedResponse { operation, field } => {
                write!(f, "{} response is missing `{}`", operation, field)
            }
        }
    }
}

impl std::error::Error for RemoteError {}
