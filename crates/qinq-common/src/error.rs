//! Error types for provisioning operations.
//!
//! Configuration errors are fatal and reject startup. Errors raised while
//! handling an attach event are local to one group/switch pairing and never
//! abort the rest of the event.

use std::io;
use std::path::PathBuf;

use qinq_types::DatapathId;
use thiserror::Error;

/// Result type alias for provisioning operations.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Errors that can occur while loading the table or provisioning a switch.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A port label is claimed by more than one group.
    #[error("Port label '{label}' is claimed by both group '{first}' and group '{second}'")]
    ConfigurationConflict {
        /// The contested label.
        label: String,
        /// Group that claimed the label first.
        first: String,
        /// Group that claimed it again.
        second: String,
    },

    /// No port on the switch matches any label of the group.
    #[error("No port on switch {datapath} matches any label of group '{group}'")]
    PortNotFound {
        /// The switch that was searched.
        datapath: DatapathId,
        /// The group that could not be placed.
        group: String,
    },

    /// The external layer refused or could not accept an add-flow request.
    #[error("Failed to submit flow to switch {datapath}: {reason}")]
    InstallSubmissionFailure {
        /// Target switch.
        datapath: DatapathId,
        /// Why the submission was refused.
        reason: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// Configuration file could not be read.
    #[error("Failed to read configuration '{}': {source}", path.display())]
    ConfigRead {
        /// Path of the file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration '{origin}': {message}")]
    ConfigParse {
        /// File path, or `<inline>` for in-memory documents.
        origin: String,
        /// Parser message.
        message: String,
    },
}

impl ProvisionError {
    /// Creates a configuration conflict error.
    pub fn conflict(
        label: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::ConfigurationConflict {
            label: label.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Creates a port not found error.
    pub fn port_not_found(datapath: DatapathId, group: impl Into<String>) -> Self {
        Self::PortNotFound {
            datapath,
            group: group.into(),
        }
    }

    /// Creates a submission failure.
    pub fn submission(datapath: DatapathId, reason: impl Into<String>) -> Self {
        Self::InstallSubmissionFailure {
            datapath,
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(origin: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::ConfigParse {
            origin: origin.into(),
            message: message.to_string(),
        }
    }

    /// Returns true if this error must reject startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProvisionError::ConfigurationConflict { .. }
                | ProvisionError::InvalidConfig { .. }
                | ProvisionError::ConfigRead { .. }
                | ProvisionError::ConfigParse { .. }
        )
    }
}
