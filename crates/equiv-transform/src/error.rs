//! Error types for equiv-transform

use equiv_core::{Location, MismatchKind};

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause of a transform failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transformer could not run or reported failure
    #[error("Transform failed: {message}")]
    TransformExecution {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error(transparent)]
    Core(#[from] equiv_core::Error),
}

impl Error {
    pub fn execution(message: impl Into<String>) -> Self {
        Self::TransformExecution {
            message: message.into(),
            source: None,
        }
    }

    pub fn execution_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::TransformExecution {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn kind(&self) -> Option<MismatchKind> {
        match self {
            Self::Core(e) => e.kind(),
            Self::TransformExecution { .. } => None,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Core(e) => e.location(),
            Self::TransformExecution { .. } => None,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_mismatch())
    }
}
