use thiserror::Error;
use vim_proto::types::LocalizedMethodFault;
use vim_proto::ManagedObjectReference;

#[derive(Debug, Error)]
pub enum VimError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to encode or decode payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("remote fault {type_name}: {message}")]
    Fault {
        type_name: String,
        message: String,
        detail: serde_json::Value,
    },
    #[error("unexpected status: {status} body={body}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("property {property} of {this} is not set")]
    MissingProperty {
        this: ManagedObjectReference,
        property: String,
    },
    #[error("task {task} failed: {}", .fault.message())]
    TaskFailed {
        task: ManagedObjectReference,
        fault: LocalizedMethodFault,
    },
    #[error("lease {lease} failed: {}", .fault.message())]
    LeaseFailed {
        lease: ManagedObjectReference,
        fault: LocalizedMethodFault,
    },
    #[error("lease {lease} is already closed")]
    LeaseClosed { lease: ManagedObjectReference },
}

impl VimError {
    /// Remote fault type when the error came from the server, e.g. `NotFound`.
    pub fn fault_type(&self) -> Option<&str> {
        match self {
            VimError::Fault { type_name, .. } => Some(type_name.as_str()),
            VimError::TaskFailed { fault, .. } | VimError::LeaseFailed { fault, .. } => {
                Some(fault.type_name())
            }
            _ => None,
        }
    }
}

pub type VimResult<T> = Result<T, VimError>;
