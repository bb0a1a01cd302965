//! Snowflake records and the fixed-capacity pool.
//!
//! A flake is in exactly one of three states: dead (`radius <= 0`), alive,
//! or extinguishing (`extinction_timer > 0`). Flakes are created only by
//! [`Snowflakes::spawn`], mutated only by the integration stage, and removed
//! only by [`Snowflakes::compact`].

use glam::Vec3;
use rand::Rng;

use crate::config::SnowParams;
use crate::constants::{
    CEILING_DROP_MAX, CEILING_DROP_MIN, DRIFT_HALF_EXTENT, GRAVITY_MAGNITUDE,
    SMALL_FLAKE_SPEED_SCALE, SPEED_JITTER_MAX, SPEED_JITTER_MIN,
};

/// One simulated snowflake.
#[derive(Clone, Copy, Debug)]
pub struct Snowflake {
    /// World position.
    pub position: Vec3,
    /// World radius; > 0 means the flake is alive.
    pub radius: f32,
    /// World velocity.
    pub velocity: Vec3,
    /// Remaining melt time; > 0 means the flake is extinguishing.
    pub extinction_timer: f32,
    /// Slot in this tick's hit array, -1 when the flake holds no query.
    pub result_slot: i32,
}

impl Snowflake {
    pub(crate) const DEAD: Snowflake = Snowflake {
        position: Vec3::ZERO,
        radius: -1.0,
        velocity: Vec3::ZERO,
        extinction_timer: -1.0,
        result_slot: -1,
    };

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.radius > 0.0
    }

    #[inline]
    pub fn is_extinguishing(&self) -> bool {
        self.extinction_timer > 0.0
    }
}

/// Fixed-capacity flake pool with a fractional spawn accumulator.
///
/// `list` never grows or shrinks after construction; `list[..active]` holds
/// the live flakes and everything past `active` is scratch, not guaranteed
/// zeroed. The pipeline is the single writer per tick.
pub struct Snowflakes {
    /// All slots; length is the pool capacity.
    pub list: Vec<Snowflake>,
    /// Live flakes occupy `list[..active]`.
    pub active: usize,
    /// Fractional spawn budget carried between ticks.
    budget: f32,
}

impl Snowflakes {
    /// Create a pool of `capacity` dead slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: vec![Snowflake::DEAD; capacity],
            active: 0,
            budget: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.list.len()
    }

    /// Live flakes, alive or extinguishing.
    pub fn live(&self) -> &[Snowflake] {
        &self.list[..self.active]
    }

    pub fn live_mut(&mut self) -> &mut [Snowflake] {
        &mut self.list[..self.active]
    }

    /// Fractional spawn budget carried into the next tick.
    pub fn spawn_budget(&self) -> f32 {
        self.budget
    }

    /// Spawn stage: accrue budget and fill fresh slots around `focus`.
    ///
    /// The budget is capped against the remaining room, so the pool never
    /// overflows and any whole-flake surplus is dropped while the fractional
    /// remainder carries to the next tick.
    pub fn spawn(&mut self, dt: f32, focus: Vec3, rng: &mut impl Rng, params: &SnowParams) {
        let room = self.capacity() - self.active;
        self.budget = (self.budget + params.flakes_per_second * dt).min(room as f32);

        let count = self.budget as usize;
        for _ in 0..count {
            self.list[self.active] = spawn_flake(focus, rng, params);
            self.active += 1;
        }
        self.budget -= count as f32;
    }

    /// Compact stage: swap dead flakes with the tail and shrink.
    ///
    /// The scan re-examines the swapped-in slot before advancing, so a dead
    /// flake pulled from the tail is never skipped. Survivor order is not
    /// preserved.
    pub fn compact(&mut self) {
        let mut i = 0;
        while i < self.active {
            if self.list[i].radius <= 0.0 {
                self.list[i] = self.list[self.active - 1];
                self.active -= 1;
            } else {
                i += 1;
            }
        }
    }
}

/// Build one fresh flake around the focal point.
fn spawn_flake(focus: Vec3, rng: &mut impl Rng, params: &SnowParams) -> Snowflake {
    let extent = params.spawn_box_extent;
    let position = Vec3::new(
        focus.x + rng.gen_range(-extent..extent),
        focus.y + params.ceiling_above_focus + rng.gen_range(CEILING_DROP_MIN..CEILING_DROP_MAX),
        focus.z + rng.gen_range(-extent..extent),
    );

    let radius = rng.gen_range(params.min_radius..params.max_radius);
    let radius_frac = (radius - params.min_radius) * params.radius_range_inv();

    // Smaller flakes fall relatively slower.
    let speed = params.fall_speed
        * rng.gen_range(SPEED_JITTER_MIN..SPEED_JITTER_MAX)
        * (SMALL_FLAKE_SPEED_SCALE + (1.0 - SMALL_FLAKE_SPEED_SCALE) * radius_frac);

    let direction = Vec3::new(
        rng.gen_range(-DRIFT_HALF_EXTENT..DRIFT_HALF_EXTENT),
        -1.0,
        rng.gen_range(-DRIFT_HALF_EXTENT..DRIFT_HALF_EXTENT),
    )
    .normalize();

    Snowflake {
        position,
        radius,
        velocity: direction * (GRAVITY_MAGNITUDE * speed),
        extinction_timer: -1.0,
        result_slot: -1,
    }
}
