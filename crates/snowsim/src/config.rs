//! Simulation parameters, fixed at initialization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snowfall simulation parameters.
///
/// All values are fixed when the simulation is created; there is no hot
/// reload. The defaults are the reference tuning for a player-tracking
/// snowfall volume.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnowParams {
    /// Maximum number of live flakes.
    pub capacity: usize,
    /// Spawn rate in flakes per second; fractional remainders accumulate
    /// across ticks so the long-run rate is exact.
    pub flakes_per_second: f32,
    /// Fall speed multiplier applied to every flake.
    pub fall_speed: f32,
    /// Flakes whose height drops below this start melting.
    pub absolute_floor: f32,
    /// Spawn height above the focal point.
    pub ceiling_above_focus: f32,
    /// Half extent of the spawn box around the focal point, X and Z.
    pub spawn_box_extent: f32,
    /// Minimum flake radius in world units.
    pub min_radius: f32,
    /// Maximum flake radius in world units.
    pub max_radius: f32,
    /// Multiplier for sampled turbulence vectors.
    pub turbulence_strength: f32,
    /// Turbulence grid dimensions (width, height, depth).
    pub turbulence_dims: (usize, usize, usize),
    /// Master RNG seed; fixes turbulence generation and spawn placement.
    pub seed: u64,
}

impl Default for SnowParams {
    fn default() -> Self {
        Self {
            capacity: 8192,
            flakes_per_second: 900.0,
            fall_speed: 0.5,
            absolute_floor: 0.0,
            ceiling_above_focus: 7.0,
            spawn_box_extent: 15.0,
            min_radius: 0.01,
            max_radius: 0.06,
            turbulence_strength: 0.8,
            turbulence_dims: (16, 16, 16),
            seed: 533723,
        }
    }
}

/// Rejected configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("capacity must be positive")]
    ZeroCapacity,
    #[error("min radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("flake radius range is empty: min {min} >= max {max}")]
    EmptyRadiusRange { min: f32, max: f32 },
    #[error("turbulence grid must be non-degenerate, got {0}x{1}x{2}")]
    DegenerateTurbulenceGrid(usize, usize, usize),
    #[error("{name} is out of range: {value}")]
    InvalidParam { name: &'static str, value: f32 },
}

impl SnowParams {
    /// Check every precondition. Called by
    /// [`SnowSimulation::new`](crate::SnowSimulation::new); invalid
    /// configuration fails here, never at runtime.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.capacity == 0 {
            return Err(ParamsError::ZeroCapacity);
        }
        // A flake born with radius <= 0 would be born dead.
        if !(self.min_radius > 0.0) {
            return Err(ParamsError::NonPositiveRadius(self.min_radius));
        }
        if !(self.max_radius > self.min_radius) {
            return Err(ParamsError::EmptyRadiusRange {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        let (w, h, d) = self.turbulence_dims;
        if w == 0 || h == 0 || d == 0 {
            return Err(ParamsError::DegenerateTurbulenceGrid(w, h, d));
        }
        for (name, value) in [
            ("flakes_per_second", self.flakes_per_second),
            ("fall_speed", self.fall_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamsError::InvalidParam { name, value });
            }
        }
        if !self.spawn_box_extent.is_finite() || self.spawn_box_extent <= 0.0 {
            return Err(ParamsError::InvalidParam {
                name: "spawn_box_extent",
                value: self.spawn_box_extent,
            });
        }
        for (name, value) in [
            ("absolute_floor", self.absolute_floor),
            ("ceiling_above_focus", self.ceiling_above_focus),
            ("turbulence_strength", self.turbulence_strength),
        ] {
            if !value.is_finite() {
                return Err(ParamsError::InvalidParam { name, value });
            }
        }
        Ok(())
    }

    /// Precomputed `1 / (max_radius - min_radius)`.
    pub(crate) fn radius_range_inv(&self) -> f32 {
        1.0 / (self.max_radius - self.min_radius)
    }
}
