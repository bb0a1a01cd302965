//! Tuning constants for the snowfall simulation.
//!
//! Per-flake spawn jitter, extinction timers, and the intensity curve live
//! here; everything the caller is expected to tune sits in
//! [`SnowParams`](crate::SnowParams) instead.

/// Gravity acceleration magnitude (m/s^2); scales the base fall speed.
pub const GRAVITY_MAGNITUDE: f32 = 9.8;

/// Flakes per integration shard; shards cover disjoint index ranges.
pub const INTEGRATE_SHARD: usize = 100;

/// Rays extend 1.5x the distance travelled in one tick, so a contact just
/// past this tick's step is still reported one tick early.
pub const RAY_SAFETY_MARGIN: f32 = 1.5;

// =============================================================================
// Spawn jitter
// =============================================================================

/// Vertical offset range below the spawn ceiling (min, max).
pub const CEILING_DROP_MIN: f32 = -1.0;
pub const CEILING_DROP_MAX: f32 = -0.1;

/// Per-flake multiplier range on the configured fall speed.
pub const SPEED_JITTER_MIN: f32 = 0.8;
pub const SPEED_JITTER_MAX: f32 = 1.2;

/// Relative fall speed of the smallest flakes; the largest fall at 1.0.
pub const SMALL_FLAKE_SPEED_SCALE: f32 = 0.1;

/// Horizontal component range of the initial fall direction (pre-normalize).
pub const DRIFT_HALF_EXTENT: f32 = 0.5;

// =============================================================================
// Extinction timers (seconds)
// =============================================================================

/// Slow melt after crossing the absolute floor.
pub const FLOOR_MELT_MIN: f32 = 2.5;
pub const FLOOR_MELT_MAX: f32 = 5.0;

/// Fast snap after an environment contact.
pub const CONTACT_MELT_MIN: f32 = 1.5;
pub const CONTACT_MELT_MAX: f32 = 3.0;

// =============================================================================
// Intensity curve
// =============================================================================

/// Peak exported intensity.
pub const MAX_INTENSITY: f32 = 5.0;

/// Brightness factor at the minimum radius (small flakes shine brightest).
pub const INTENSITY_SMALL: f32 = 1.0;

/// Brightness factor at the maximum radius.
pub const INTENSITY_LARGE: f32 = 0.1;
