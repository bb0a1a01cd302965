//! Batched environment ray queries.
//!
//! Every eligible flake contributes one ray per tick, aimed along its
//! velocity. The service resolving the rays is external; see [`RayCaster`]
//! for its scheduling contract. Query and hit buffers live for exactly one
//! tick and are released at the join on every path.

use glam::Vec3;

use crate::constants::RAY_SAFETY_MARGIN;
use crate::particle::Snowflakes;

/// One ray handed to the collision service.
#[derive(Clone, Copy, Debug)]
pub struct RayQuery {
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
}

enum Hits {
    Ready(Vec<f32>),
    Deferred(Box<dyn FnOnce() -> Vec<f32> + Send>),
}

/// Deferred result of a dispatched batch: one hit distance per query, in
/// query order. A distance <= 0 means no hit; > 0 means a hit at that
/// distance.
pub struct PendingHits(Hits);

impl PendingHits {
    /// A batch that resolved synchronously at dispatch.
    pub fn ready(hits: Vec<f32>) -> Self {
        Self(Hits::Ready(hits))
    }

    /// A batch still in flight; `wait` drives the closure to completion.
    pub fn deferred(wait: impl FnOnce() -> Vec<f32> + Send + 'static) -> Self {
        Self(Hits::Deferred(Box::new(wait)))
    }

    /// Block until the batch is resolved.
    pub fn wait(self) -> Vec<f32> {
        match self.0 {
            Hits::Ready(hits) => hits,
            Hits::Deferred(wait) => wait(),
        }
    }
}

/// Resolves ray batches against the environment.
///
/// Scheduling contract: `dispatch` is always invoked from the thread that
/// drives the simulation tick; the service's submission entry point is not
/// callable from workers. The returned [`PendingHits`] is `Send` and is
/// resolved from the integration worker; it must yield exactly one distance
/// per query.
pub trait RayCaster {
    fn dispatch(&self, queries: Vec<RayQuery>) -> PendingHits;
}

/// Any per-ray function acts as a synchronously resolving caster.
impl<F> RayCaster for F
where
    F: Fn(&RayQuery) -> f32 + Sync,
{
    fn dispatch(&self, queries: Vec<RayQuery>) -> PendingHits {
        PendingHits::ready(queries.iter().map(self).collect())
    }
}

/// Build this tick's batch: one ray per alive, non-extinguishing flake,
/// long enough to cover 1.5x the distance travelled in `dt`. Each
/// contributor records the slot its hit will land in. Near-zero velocities
/// are not special-cased.
pub fn build_queries(pool: &mut Snowflakes, dt: f32) -> Vec<RayQuery> {
    let mut queries = Vec::with_capacity(pool.active);
    for flake in pool.live_mut() {
        if flake.is_alive() && !flake.is_extinguishing() {
            let speed = flake.velocity.length();
            flake.result_slot = queries.len() as i32;
            queries.push(RayQuery {
                origin: flake.position,
                direction: flake.velocity / speed,
                max_distance: speed * RAY_SAFETY_MARGIN * dt,
            });
        }
    }
    queries
}
