//! Kernel configuration
//!
//! Tolerances, sampling densities and numerical search parameters are carried
//! in an immutable [`GeometryConfig`] value and passed to the algorithms that
//! need them. Supports JSON and TOML files.
//!
//! Configuration is organized into logical sections:
//! - Tolerances (coincidence, duplicate merging, intersection acceptance)
//! - Sampling (arc/conic/curve tessellation density)
//! - Search (staged minimiser tolerances and iteration floors)
//! - Fixed point (integer grid used ahead of polygon clipping)
//! - Offset (Bézier offset subdivision and probe fan-out)

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default coincidence tolerance used by the cross-product predicates.
pub const EPSILON: f64 = 1e-10;

/// Tolerance settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceSettings {
    /// Cross-product and coincidence tolerance
    pub epsilon: f64,
    /// Distance under which two points are treated as the same point
    pub point_merge: f64,
    /// Largest residual gap accepted as a curve intersection
    pub intersection: f64,
}

impl Default for ToleranceSettings {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            point_merge: 1e-6,
            intersection: 1e-6,
        }
    }
}

/// How circular and elliptic arcs are sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMode {
    /// Fixed angular step of `down_sampling_value` radians
    Angular,
    /// Step chosen so the chord deviates at most `chordal_tolerance`
    Chordal,
}

impl Default for SamplingMode {
    fn default() -> Self {
        Self::Angular
    }
}

impl std::fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Angular => write!(f, "angular"),
            Self::Chordal => write!(f, "chordal"),
        }
    }
}

/// Sampling settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    /// Sampling mode for arcs
    pub mode: SamplingMode,
    /// Angular step in radians
    pub down_sampling_value: f64,
    /// Maximum sagitta for chordal sampling
    pub chordal_tolerance: f64,
    /// Local parameter step used to tessellate each Bézier segment
    pub bezier_step: f64,
    /// Tessellation samples per non-empty B-spline knot span
    pub bspline_samples_per_span: usize,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            mode: SamplingMode::Angular,
            down_sampling_value: 0.02,
            chordal_tolerance: 0.01,
            bezier_step: 0.02,
            bspline_samples_per_span: 16,
        }
    }
}

impl SamplingSettings {
    /// Angular step for an arc of the given radius.
    pub fn angular_step(&self, radius: f64) -> f64 {
        match self.mode {
            SamplingMode::Angular => self.down_sampling_value,
            SamplingMode::Chordal => {
                if radius <= self.chordal_tolerance {
                    return std::f64::consts::FRAC_PI_2;
                }
                let half = (1.0 - self.chordal_tolerance / radius).clamp(-1.0, 1.0).acos();
                (2.0 * half).clamp(1e-4, std::f64::consts::FRAC_PI_2)
            }
        }
    }
}

/// Numerical search settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Coarse samples per curve segment in phase one
    pub coarse_samples: usize,
    /// First refinement stage stops at this bracket width, relative to the domain
    pub coarse_tolerance: f64,
    /// Second refinement stage width
    pub refine_tolerance: f64,
    /// High precision stage width
    pub precision_tolerance: f64,
    /// Absolute bracket width, relative to the parameter, below which the search stops
    pub bracket_floor: f64,
    /// Repeats of the same minimum before the bracket is doubled
    pub stagnation_limit: usize,
    /// Hard iteration ceiling per stage
    pub max_iterations: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            coarse_samples: 64,
            coarse_tolerance: 1e-4,
            refine_tolerance: 2e-5,
            precision_tolerance: 1e-9,
            bracket_floor: 1e-15,
            stagnation_limit: 8,
            max_iterations: 10_000,
        }
    }
}

/// Fixed-point grid settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedPointSettings {
    /// Integer units per model unit
    pub scale: f64,
    /// Collinearity / duplicate tolerance applied to clipped output
    pub simplify_tolerance: f64,
}

impl Default for FixedPointSettings {
    fn default() -> Self {
        Self {
            scale: 1e8,
            simplify_tolerance: 1e-7,
        }
    }
}

/// Offset settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetSettings {
    /// Maximum deviation of an offset Bézier from the true offset
    pub bezier_tolerance: f64,
    /// Maximum recursive subdivision depth per segment
    pub max_subdivision_depth: usize,
    /// Number of error probes evaluated per candidate offset
    pub probe_count: usize,
    /// Worker threads for probe evaluation (0 uses the global pool)
    pub worker_threads: usize,
}

impl Default for OffsetSettings {
    fn default() -> Self {
        Self {
            bezier_tolerance: 1e-2,
            max_subdivision_depth: 8,
            probe_count: 8,
            worker_threads: 0,
        }
    }
}

/// Complete kernel configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Tolerances
    pub tolerance: ToleranceSettings,
    /// Tessellation sampling
    pub sampling: SamplingSettings,
    /// Numerical search
    pub search: SearchSettings,
    /// Fixed-point clipping grid
    pub fixed_point: FixedPointSettings,
    /// Offsetting
    pub offset: OffsetSettings,
}

impl GeometryConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(ConfigError::from)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content).map_err(ConfigError::from)?
        } else {
            return Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }
            .into());
        };

        config.validate()?;
        tracing::debug!("Loaded geometry config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> crate::Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self).map_err(ConfigError::from)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self).map_err(ConfigError::from)?
        } else {
            return Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }
            .into());
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let positive = [
            ("tolerance.epsilon", self.tolerance.epsilon),
            ("tolerance.point_merge", self.tolerance.point_merge),
            ("tolerance.intersection", self.tolerance.intersection),
            ("sampling.down_sampling_value", self.sampling.down_sampling_value),
            ("sampling.chordal_tolerance", self.sampling.chordal_tolerance),
            ("sampling.bezier_step", self.sampling.bezier_step),
            ("search.coarse_tolerance", self.search.coarse_tolerance),
            ("search.refine_tolerance", self.search.refine_tolerance),
            ("search.precision_tolerance", self.search.precision_tolerance),
            ("search.bracket_floor", self.search.bracket_floor),
            ("fixed_point.scale", self.fixed_point.scale),
            ("fixed_point.simplify_tolerance", self.fixed_point.simplify_tolerance),
            ("offset.bezier_tolerance", self.offset.bezier_tolerance),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, "must be finite and > 0"));
            }
        }

        if self.sampling.down_sampling_value >= std::f64::consts::PI {
            return Err(ConfigError::invalid(
                "sampling.down_sampling_value",
                "must be < PI",
            ));
        }
        if self.sampling.bezier_step > 1.0 {
            return Err(ConfigError::invalid("sampling.bezier_step", "must be <= 1"));
        }
        if self.sampling.bspline_samples_per_span == 0 {
            return Err(ConfigError::invalid(
                "sampling.bspline_samples_per_span",
                "must be > 0",
            ));
        }
        if self.search.coarse_samples < 2 {
            return Err(ConfigError::invalid("search.coarse_samples", "must be >= 2"));
        }
        if self.search.refine_tolerance > self.search.coarse_tolerance
            || self.search.precision_tolerance > self.search.refine_tolerance
        {
            return Err(ConfigError::invalid(
                "search",
                "stage tolerances must shrink: coarse >= refine >= precision",
            ));
        }
        if self.search.stagnation_limit == 0 || self.search.max_iterations == 0 {
            return Err(ConfigError::invalid(
                "search",
                "stagnation_limit and max_iterations must be > 0",
            ));
        }
        if self.offset.probe_count == 0 {
            return Err(ConfigError::invalid("offset.probe_count", "must be > 0"));
        }

        Ok(())
    }
}
