//! Snowfall particle simulation.
//!
//! A bounded pool of falling snowflakes around a moving focal point,
//! perturbed by a precomputed turbulence field, tested against the
//! environment through batched ray queries, and exported once per tick as
//! packed render instances.
//!
//! Each tick runs four ordered stages: spawn, query build + dispatch,
//! sharded integration, and compaction. [`SnowSimulation::begin_tick`] runs
//! the first two on the calling thread (the ray service requires dispatch
//! from there), hands the rest to a worker, and returns a [`TickHandle`].
//! The caller overlaps its own per-frame work with the in-flight tick and
//! joins with [`TickHandle::wait`] (dropping the handle joins too) before
//! reading instances. The handle borrows the simulation mutably, so touching
//! pool state before the join is rejected at compile time.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use snowsim::{RayQuery, SnowParams, SnowSimulation};
//!
//! let params = SnowParams {
//!     capacity: 256,
//!     ..Default::default()
//! };
//! let mut sim = SnowSimulation::new(params).unwrap();
//!
//! // Open sky: no ray ever hits.
//! let sky = |_: &RayQuery| -1.0f32;
//!
//! for _ in 0..60 {
//!     let tick = sim.begin_tick(1.0 / 60.0, Vec3::ZERO, &sky);
//!     // ... unrelated per-frame work runs here ...
//!     tick.wait();
//! }
//!
//! let instances = sim.instances();
//! assert_eq!(instances.len(), sim.active_count());
//! ```

pub mod config;
pub mod constants;
pub mod instances;
pub mod integrate;
pub mod particle;
pub mod raycast;
pub mod turbulence;

use std::sync::mpsc;
use std::sync::Arc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use config::{ParamsError, SnowParams};
pub use instances::{write_instances, FlakeInstance};
pub use particle::{Snowflake, Snowflakes};
pub use raycast::{build_queries, PendingHits, RayCaster, RayQuery};
pub use turbulence::TurbulenceField;

/// The snowfall simulation: pool, turbulence field, and tick orchestration.
pub struct SnowSimulation {
    params: SnowParams,
    turbulence: Arc<TurbulenceField>,
    /// Taken while a tick is in flight; the worker sends it back at the join.
    pool: Option<Snowflakes>,
    /// Master RNG: turbulence generation, spawn placement, per-tick seeds.
    rng: StdRng,
    frame: u64,
}

impl SnowSimulation {
    /// Validate `params` and build the simulation, including the one-time
    /// turbulence field generation.
    pub fn new(params: SnowParams) -> Result<Self, ParamsError> {
        params.validate()?;

        let mut rng = StdRng::seed_from_u64(params.seed);
        let turbulence = TurbulenceField::generate(params.turbulence_dims, &mut rng);
        let (w, h, d) = turbulence.dims();
        log::debug!("generated {w}x{h}x{d} turbulence field, capacity {}", params.capacity);

        Ok(Self {
            pool: Some(Snowflakes::new(params.capacity)),
            turbulence: Arc::new(turbulence),
            rng,
            frame: 0,
            params,
        })
    }

    /// Kick off one simulation tick and return its join handle.
    ///
    /// Spawn and query construction run here, synchronously: the post-spawn
    /// population feeds the batch, and the ray service requires dispatch from
    /// the tick-driving thread. Integration and compaction run on a worker;
    /// the query and hit buffers die with the worker on every path.
    pub fn begin_tick(
        &mut self,
        dt: f32,
        focus: Vec3,
        caster: &impl RayCaster,
    ) -> TickHandle<'_> {
        let mut pool = self
            .pool
            .take()
            .expect("a previous tick was abandoned without joining");

        // 1. Spawn.
        pool.spawn(dt, focus, &mut self.rng, &self.params);

        // 2. Build and dispatch the collision batch.
        let queries = raycast::build_queries(&mut pool, dt);
        let pending = caster.dispatch(queries);

        // 3-4. Integrate shards, then compact, off-thread. The pool travels
        // with the task and comes back at the join.
        let tick_seed = self.rng.gen();
        let turbulence = Arc::clone(&self.turbulence);
        let params = self.params.clone();
        let (tx, rx) = mpsc::channel();
        rayon::spawn(move || {
            let hits = pending.wait();
            integrate::integrate(&mut pool, &turbulence, &hits, dt, tick_seed, &params);
            pool.compact();
            let _ = tx.send(pool);
        });

        self.frame += 1;
        TickHandle { sim: self, rx: Some(rx) }
    }

    /// Run one tick to completion: [`Self::begin_tick`] plus the join.
    pub fn update(&mut self, dt: f32, focus: Vec3, caster: &impl RayCaster) {
        self.begin_tick(dt, focus, caster).wait();
    }

    pub fn params(&self) -> &SnowParams {
        &self.params
    }

    pub fn turbulence(&self) -> &TurbulenceField {
        &self.turbulence
    }

    /// Ticks started so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The flake pool. Not callable while a tick is in flight.
    pub fn flakes(&self) -> &Snowflakes {
        self.pool
            .as_ref()
            .expect("a previous tick was abandoned without joining")
    }

    /// Live flakes after the last completed tick.
    pub fn active_count(&self) -> usize {
        self.flakes().active
    }

    /// Write one render record per live flake; see
    /// [`instances::write_instances`] for the buffer contract.
    pub fn write_instances(&self, out: &mut [FlakeInstance]) -> usize {
        instances::write_instances(self.flakes(), &self.params, out)
    }

    /// Collect this tick's render records into a fresh, exactly sized vec.
    pub fn instances(&self) -> Vec<FlakeInstance> {
        use bytemuck::Zeroable;
        let pool = self.flakes();
        let mut out = vec![FlakeInstance::zeroed(); pool.active];
        instances::write_instances(pool, &self.params, &mut out);
        out
    }
}

/// An in-flight simulation tick.
///
/// [`TickHandle::wait`] blocks until integration and compaction finish and
/// returns the pool to the simulation; dropping the handle joins the same
/// way, so a tick is always drained even on early exits. There is no
/// cancellation.
#[must_use = "dropping the handle joins immediately; hold it to overlap work"]
pub struct TickHandle<'a> {
    sim: &'a mut SnowSimulation,
    rx: Option<mpsc::Receiver<Snowflakes>>,
}

impl TickHandle<'_> {
    /// Join the in-flight tick.
    pub fn wait(self) {
        // Drop performs the join.
    }
}

impl Drop for TickHandle<'_> {
    fn drop(&mut self) {
        if let Some(rx) = self.rx.take() {
            let pool = rx
                .recv()
                .expect("snow worker disconnected before finishing the tick");
            self.sim.pool = Some(pool);
        }
    }
}
