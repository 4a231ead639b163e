//! Error types for Forage operations.
//!
//! Every fallible operation in the workspace returns [`Result`]. Failures are
//! local to the operation that raised them; only cluster placement retries
//! internally, and it does so against a fixed budget.

use thiserror::Error;

/// Result type for Forage operations.
pub type Result<T> = std::result::Result<T, ForageError>;

/// Errors that can occur during Forage operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForageError {
    /// Invalid static parameters, detected at construction time.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Cluster placement exhausted its retry budget.
    #[error("Cluster placement failed after {attempts} attempts: {reason}")]
    Placement { attempts: u32, reason: String },

    /// No free cell is left for a block drop.
    #[error("No free cell in {region}")]
    NoFreeCell { region: String },

    /// A selection matrix was queried for a key it was not built with.
    #[error("Selection matrix key not found: {0}")]
    KeyNotFound(String),

    /// A discrete coordinate or region falls outside the grid.
    #[error("({x}, {y}) is outside the {xsize}x{ysize} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        xsize: usize,
        ysize: usize,
    },

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ForageError {
    fn from(e: serde_json::Error) -> Self {
        ForageError::Serialization(e.to_string())
    }
}

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Out of range.
    #[error("{field} out of range: {value} (must be {min}-{max})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

// Convenience constructors
impl ForageError {
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ForageError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        ForageError::Config(ConfigError::OutOfRange {
            field: field.into(),
            min,
            max,
            value,
        })
    }

    pub fn placement(attempts: u32, reason: impl Into<String>) -> Self {
        ForageError::Placement {
            attempts,
            reason: reason.into(),
        }
    }

    pub fn no_free_cell(region: impl Into<String>) -> Self {
        ForageError::NoFreeCell {
            region: region.into(),
        }
    }

    pub fn key_not_found(key: impl std::fmt::Display) -> Self {
        ForageError::KeyNotFound(key.to_string())
    }

    /// Whether a caller can recover by switching to another strategy.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ForageError::Placement { .. } | ForageError::NoFreeCell { .. }
        )
    }
}
