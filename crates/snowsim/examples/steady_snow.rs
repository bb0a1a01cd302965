//! Steady snowfall over a flat ground plane, with the tick overlapped
//! against (stand-in) per-frame work the way a game loop would drive it.
//!
//! Run with: cargo run -p snowsim --example steady_snow --release

use glam::Vec3;
use snowsim::{RayQuery, SnowParams, SnowSimulation};

const GROUND_HEIGHT: f32 = 0.25;

fn ground(q: &RayQuery) -> f32 {
    if q.direction.y >= 0.0 {
        return -1.0;
    }
    let distance = (q.origin.y - GROUND_HEIGHT) / -q.direction.y;
    if distance >= 0.0 && distance <= q.max_distance {
        distance
    } else {
        -1.0
    }
}

fn main() {
    let params = SnowParams {
        capacity: 4096,
        flakes_per_second: 600.0,
        ..Default::default()
    };
    let mut sim = SnowSimulation::new(params).expect("valid default tuning");

    let dt = 1.0 / 60.0;
    for frame in 0..1800u32 {
        // The focal point wanders like a tracked player.
        let t = frame as f32 * dt;
        let focus = Vec3::new((t * 0.4).sin() * 10.0, 1.7, (t * 0.3).cos() * 10.0);

        let tick = sim.begin_tick(dt, focus, &ground);
        // Camera, creatures, UI... anything that does not touch the pool
        // overlaps with the in-flight tick here.
        tick.wait();

        if frame % 60 == 0 {
            let instances = sim.instances();
            let melting = instances
                .iter()
                .filter(|i| i.intensity < 0.05 * 5.0)
                .count();
            let avg_intensity: f32 =
                instances.iter().map(|i| i.intensity).sum::<f32>() / instances.len().max(1) as f32;
            println!(
                "t={t:5.1}s  active={:4}  dim={melting:4}  avg intensity={avg_intensity:.2}",
                instances.len()
            );
        }
    }
}
