//! # DraftKit Core
//!
//! Core types shared by the DraftKit geometry kernel.
//! Provides the error taxonomy and the immutable configuration value that
//! carries tolerances, sampling densities and numerical search parameters.

pub mod config;
pub mod error;

pub use config::{
    FixedPointSettings, GeometryConfig, OffsetSettings, SamplingMode, SamplingSettings,
    SearchSettings, ToleranceSettings, EPSILON,
};
pub use error::{ConfigError, Error, GeometryError, GeometryResult, Result};
