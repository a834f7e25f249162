//! Error handling for DraftKit
//!
//! Provides the error types shared by every layer of the kernel:
//! - Geometry errors (degenerate input, no-result conditions)
//! - Configuration errors (invalid tolerances, unreadable config files)
//!
//! Expected geometric degeneracies are reported as values, never as panics.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Represents conditions under which a geometric algorithm cannot produce a
/// result. Every variant is local and recoverable by the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Input is too degenerate for the requested operation
    #[error("Degenerate input: {reason}")]
    DegenerateInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// Ear clipping made no progress during a full pass over the ring
    #[error("Polygon is not simple: ear clipping stalled with {remaining} vertices left")]
    NonSimplePolygon {
        /// Number of ring vertices left unclipped.
        remaining: usize,
    },

    /// Shrinking would invert the shape
    #[error("Offset {distance} collapses shape with extent {extent}")]
    OffsetCollapse {
        /// The requested offset distance.
        distance: f64,
        /// The extent that limits how far the shape may shrink.
        extent: f64,
    },

    /// Knot vector length does not match the control points
    #[error("Invalid knot vector: expected {expected} knots, got {actual}")]
    InvalidKnotVector {
        /// Required knot count.
        expected: usize,
        /// Supplied knot count.
        actual: usize,
    },

    /// Control point layout is unusable
    #[error("Invalid control points ({count}): {reason}")]
    InvalidControlPoints {
        /// Number of control points supplied.
        count: usize,
        /// Why the layout is invalid.
        reason: String,
    },

    /// Curve parameter outside its domain
    #[error("Parameter {value} out of range")]
    ParameterOutOfRange {
        /// The offending parameter.
        value: f64,
    },

    /// Polygon clipping produced no usable output
    #[error("Clipping failed: {reason}")]
    Clipping {
        /// Why clipping failed.
        reason: String,
    },

    /// Generic geometry error
    #[error("Geometry error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

impl GeometryError {
    /// Shorthand for [`GeometryError::DegenerateInput`].
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    /// Returns true for conditions that simply mean "no result".
    pub fn is_no_result(&self) -> bool {
        matches!(
            self,
            Self::NonSimplePolygon { .. } | Self::OffsetCollapse { .. } | Self::Clipping { .. }
        )
    }
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration value is out of range
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// The dotted path of the field.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// Unsupported file extension
    #[error("Config file must be .json or .toml: {path}")]
    UnsupportedFormat {
        /// The rejected path.
        path: String,
    },

    /// JSON (de)serialisation failed
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("Invalid TOML config: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialisation failed
    #[error("Failed to serialize TOML config: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidValue`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for DraftKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for the geometry algorithms
pub type GeometryResult<T> = std::result::Result<T, GeometryError>;
