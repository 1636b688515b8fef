//! Remote retrieval errors

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Unable to list {resource_type} resources")]
    Enumeration {
        resource_type: String,
        #[source]
        source: BoxError,
    },

    #[error("Unable to read {resource_type} {id}: {message}")]
    Fetch {
        resource_type: String,
        id: String,
        message: String,
    },

    #[error("Unable to deserialize {resource_type}: {message}")]
    Deserialize {
        resource_type: String,
        message: String,
    },

    #[error("Fetch task panicked: {0}")]
    TaskPanicked(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RemoteError {
    pub fn enumeration(
        resource_type: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        RemoteError::Enumeration {
            resource_type: resource_type.into(),
            source: source.into(),
        }
    }

    pub fn fetch(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        RemoteError::Fetch {
            resource_type: resource_type.into(),
            id: id.into(),
            message: message.to_string(),
        }
    }

    /// Resource type the failure is about, if known
    pub fn resource_type(&self) -> Option<&str> {
        match self {
            RemoteError::Enumeration { resource_type, .. }
            | RemoteError::Fetch { resource_type, .. }
            | RemoteError::Deserialize { resource_type, .. } => Some(resource_type),
            _ => None,
        }
    }

    /// Message followed by every underlying cause, `: ` separated
    pub fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            detail.push_str(": ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        detail
    }
}

pub type Result<T> = std::result::Result<T, RemoteError>;
