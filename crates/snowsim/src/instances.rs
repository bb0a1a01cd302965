//! Render-ready instance records.
//!
//! The pool is exported once per tick, after compaction, as a tightly packed
//! Pod array a renderer can upload directly. The simulation keeps no
//! ownership of exported records.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::config::SnowParams;
use crate::constants::{INTENSITY_LARGE, INTENSITY_SMALL, MAX_INTENSITY};
use crate::particle::Snowflakes;

/// Per-flake render record. GPU-facing layout: 32 bytes, no padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FlakeInstance {
    pub position: Vec3,
    pub radius: f32,
    pub velocity: Vec3,
    pub intensity: f32,
}

const _: () = assert!(std::mem::size_of::<FlakeInstance>() == 32);

/// Write one record per live flake into `out`; returns the record count.
///
/// `out.len()` must be at least `pool.active`; slots past the count are left
/// untouched. Smaller flakes shine brighter, and extinguishing flakes fade
/// with the last second of their timer.
pub fn write_instances(pool: &Snowflakes, params: &SnowParams, out: &mut [FlakeInstance]) -> usize {
    assert!(
        out.len() >= pool.active,
        "instance buffer holds {} records but {} flakes are active",
        out.len(),
        pool.active
    );

    let range_inv = params.radius_range_inv();
    for (record, flake) in out.iter_mut().zip(pool.live()) {
        let frac = (flake.radius - params.min_radius) * range_inv;
        let brightness = INTENSITY_SMALL + (INTENSITY_LARGE - INTENSITY_SMALL) * frac;
        let mut intensity = brightness * brightness * MAX_INTENSITY;
        if flake.is_extinguishing() {
            intensity *= flake.extinction_timer.clamp(0.0, 1.0);
        }

        *record = FlakeInstance {
            position: flake.position,
            radius: flake.radius,
            velocity: flake.velocity,
            intensity,
        };
    }
    pool.active
}
