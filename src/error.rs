//! Error types for campaignsim.
//!
//! All errors are strongly typed using thiserror so callers can
//! pattern match on the specific condition instead of parsing messages.

use thiserror::Error;

use crate::config::ConfigError;
use crate::directory::DirectoryError;
use crate::selection::SelectionId;

/// Validation errors that occur during input validation.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Campaign budget must be a positive amount, got {budget}")]
    NonPositiveBudget {
        budget: f64,
    },

    #[error("Target impressions must be greater than zero")]
    NonPositiveTargetImpressions,

    #[error("Creator count must be greater than zero")]
    NonPositiveCreatorCount,

    #[error("No campaign goal has been set")]
    MissingGoal,

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Field '{field}' must be a finite, non-negative number, got {value}")]
    InvalidRate {
        field: String,
        value: f64,
    },

    #[error("Impression count overflowed for {creator} on {platform}")]
    ImpressionOverflow {
        creator: String,
        platform: String,
    },

    #[error("Total impressions overflowed")]
    TotalImpressionOverflow,

    #[error("Creator '{name}' is already on the roster")]
    DuplicateCreator {
        name: String,
    },

    #[error("Creator '{name}' is not on the roster")]
    UnknownCreator {
        name: String,
    },

    #[error("Platform '{platform}' is not staged for creator '{creator}'")]
    UnknownStagedPlatform {
        creator: String,
        platform: String,
    },

    #[error("Selection not found: {id}")]
    UnknownSelection {
        id: SelectionId,
    },
}

/// Execution errors that occur while running a simulation or resolving inputs.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Creator not found in directory: {name}")]
    CreatorNotFound {
        name: String,
    },

    #[error("Creator '{name}' has no metrics for platform '{platform}'")]
    PlatformNotFound {
        name: String,
        platform: String,
    },

    #[error("Simulation timed out after {duration_ms}ms")]
    Timeout {
        duration_ms: u64,
    },

    #[error("Simulation queue is full (capacity: {capacity})")]
    QueueFull {
        capacity: usize,
    },

    #[error("Simulation workers disconnected")]
    Disconnected,
}

/// Top-level error type for campaignsim.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl CampaignError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an execution error.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Execution(e) => matches!(e, ExecutionError::Timeout { .. } | ExecutionError::QueueFull { .. }),
            Self::Directory(e) => matches!(e, DirectoryError::BackendError(_)),
            Self::Validation(_) | Self::Config(_) | Self::Internal { .. } => false,
        }
    }
}

/// Result type alias for campaignsim operations.
pub type CampaignResult<T> = Result<T, CampaignError>;
