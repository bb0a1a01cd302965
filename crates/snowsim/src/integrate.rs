//! Integration stage: advance live flakes, trigger extinction, age melters.
//!
//! The live range is split into fixed-size disjoint shards processed in
//! parallel. Shards share only the read-only turbulence field and the hit
//! array, so no synchronization is needed between them.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::config::SnowParams;
use crate::constants::{
    CONTACT_MELT_MAX, CONTACT_MELT_MIN, FLOOR_MELT_MAX, FLOOR_MELT_MIN, INTEGRATE_SHARD,
};
use crate::particle::{Snowflake, Snowflakes};
use crate::turbulence::TurbulenceField;

/// Advance every live flake by `dt`.
///
/// `tick_seed` fixes the extinction draws: shard `i` derives its RNG from
/// `tick_seed + i`, so the stage is deterministic for a given seed no matter
/// how shards are scheduled.
pub fn integrate(
    pool: &mut Snowflakes,
    turbulence: &TurbulenceField,
    hits: &[f32],
    dt: f32,
    tick_seed: u64,
    params: &SnowParams,
) {
    pool.live_mut()
        .par_chunks_mut(INTEGRATE_SHARD)
        .enumerate()
        .for_each(|(shard, flakes)| {
            let mut rng = ChaCha8Rng::seed_from_u64(tick_seed.wrapping_add(shard as u64));
            for flake in flakes {
                step_flake(flake, turbulence, hits, dt, params, &mut rng);
            }
        });
}

/// One flake, one tick.
///
/// Extinguishing flakes ignore turbulence and collisions and only age toward
/// death. For the rest, the floor check runs before the hit check and wins
/// when both would fire in the same tick.
fn step_flake(
    flake: &mut Snowflake,
    turbulence: &TurbulenceField,
    hits: &[f32],
    dt: f32,
    params: &SnowParams,
    rng: &mut ChaCha8Rng,
) {
    if !flake.is_extinguishing() {
        let bias = turbulence.sample(flake.position);
        flake.position += (flake.velocity + bias * params.turbulence_strength) * dt;

        if flake.position.y < params.absolute_floor {
            flake.extinction_timer = rng.gen_range(FLOOR_MELT_MIN..FLOOR_MELT_MAX);
            return;
        }

        debug_assert!(flake.result_slot >= 0, "live flake missing its query slot");
        if hits[flake.result_slot as usize] > 0.0 {
            flake.extinction_timer = rng.gen_range(CONTACT_MELT_MIN..CONTACT_MELT_MAX);
        }
    } else {
        flake.extinction_timer -= dt;
        if flake.extinction_timer <= 0.0 {
            flake.radius = -1.0;
        }
    }
}
