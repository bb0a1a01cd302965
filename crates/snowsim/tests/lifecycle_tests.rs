//! Lifecycle tests driven through the public stage functions.
//!
//! These verify the state machine edges the pipeline relies on:
//! spawn accumulation, both extinction triggers, exact melt, and
//! swap-remove compaction.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use snowsim::constants::{
    CONTACT_MELT_MAX, CONTACT_MELT_MIN, FLOOR_MELT_MAX, FLOOR_MELT_MIN,
};
use snowsim::{integrate::integrate, Snowflake, Snowflakes, SnowParams, TurbulenceField};

fn still_params() -> SnowParams {
    SnowParams {
        turbulence_strength: 0.0,
        ..Default::default()
    }
}

fn field(params: &SnowParams) -> TurbulenceField {
    let mut rng = StdRng::seed_from_u64(params.seed);
    TurbulenceField::generate(params.turbulence_dims, &mut rng)
}

fn live_flake(y: f32, velocity: Vec3, slot: i32) -> Snowflake {
    Snowflake {
        position: Vec3::new(0.0, y, 0.0),
        radius: 0.03,
        velocity,
        extinction_timer: -1.0,
        result_slot: slot,
    }
}

#[test]
fn spawn_accumulates_exactly_one_per_tick_at_rate_20() {
    let params = SnowParams {
        flakes_per_second: 20.0,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut pool = Snowflakes::new(params.capacity);

    for tick in 1..=3 {
        pool.spawn(0.05, Vec3::ZERO, &mut rng, &params);
        assert_eq!(pool.active, tick, "one new flake per 50 ms tick at 20/s");
    }
}

#[test]
fn spawn_accumulates_every_other_tick_at_rate_10() {
    let params = SnowParams {
        flakes_per_second: 10.0,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut pool = Snowflakes::new(params.capacity);

    let mut actives = Vec::new();
    for _ in 0..4 {
        pool.spawn(0.05, Vec3::ZERO, &mut rng, &params);
        actives.push(pool.active);
    }
    assert_eq!(actives, vec![0, 1, 1, 2]);
}

#[test]
fn floor_extinction_fires_in_the_breaching_tick() {
    let params = still_params();
    let field = field(&params);
    let mut pool = Snowflakes::new(4);
    // One step of -10 m/s at 10 ms lands at y = -0.1, below the default
    // floor at zero.
    pool.list[0] = live_flake(0.0, Vec3::new(0.0, -10.0, 0.0), 0);
    pool.active = 1;

    integrate(&mut pool, &field, &[-1.0], 0.01, 5, &params);

    let flake = &pool.list[0];
    assert!(flake.is_extinguishing());
    assert!(
        flake.extinction_timer >= FLOOR_MELT_MIN && flake.extinction_timer < FLOOR_MELT_MAX,
        "floor breach must draw from the slow-melt range, got {}",
        flake.extinction_timer
    );
}

#[test]
fn floor_takes_precedence_over_a_hit() {
    let params = still_params();
    let field = field(&params);
    let mut pool = Snowflakes::new(4);
    // Breaches the floor while its query also reports a hit; the timer must
    // still come from the slow range whenever it exceeds the contact cap.
    for trial in 0..16 {
        pool.list[0] = live_flake(0.0, Vec3::new(0.0, -10.0, 0.0), 0);
        pool.active = 1;
        integrate(&mut pool, &field, &[0.01], 0.01, trial, &params);
        let timer = pool.list[0].extinction_timer;
        assert!(timer >= FLOOR_MELT_MIN, "contact-range draw on trial {trial}: {timer}");
    }
}

#[test]
fn collision_extinction_draws_from_the_fast_range() {
    let params = still_params();
    let field = field(&params);
    let mut pool = Snowflakes::new(4);
    pool.list[0] = live_flake(10.0, Vec3::new(0.0, -1.0, 0.0), 0);
    pool.active = 1;

    integrate(&mut pool, &field, &[0.5], 0.01, 5, &params);

    let flake = &pool.list[0];
    assert!(flake.is_extinguishing());
    assert!(
        flake.extinction_timer >= CONTACT_MELT_MIN && flake.extinction_timer < CONTACT_MELT_MAX,
        "hit must draw from the fast-melt range, got {}",
        flake.extinction_timer
    );
}

#[test]
fn extinguishing_flake_dies_after_its_timer_elapses() {
    let params = still_params();
    let field = field(&params);
    let mut pool = Snowflakes::new(4);
    pool.list[0] = Snowflake {
        extinction_timer: 0.5,
        ..live_flake(10.0, Vec3::ZERO, -1)
    };
    pool.active = 1;

    for tick in 1..=4 {
        integrate(&mut pool, &field, &[], 0.125, 5, &params);
        let alive = pool.list[0].is_alive();
        assert_eq!(alive, tick < 4, "flake must die exactly on tick 4");
    }

    pool.compact();
    assert_eq!(pool.active, 0);
}

#[test]
fn compaction_preserves_the_live_set() {
    let mut pool = Snowflakes::new(16);
    let mut expected = Vec::new();
    for i in 0..10 {
        let radius = if i % 3 == 0 { -1.0 } else { 0.01 + i as f32 * 0.001 };
        pool.list[i] = Snowflake {
            radius,
            ..live_flake(5.0, Vec3::ZERO, -1)
        };
        if radius > 0.0 {
            expected.push(radius);
        }
    }
    pool.active = 10;

    pool.compact();

    assert_eq!(pool.active, expected.len());
    let mut survivors: Vec<f32> = pool.live().iter().map(|f| f.radius).collect();
    survivors.sort_by(f32::total_cmp);
    expected.sort_by(f32::total_cmp);
    assert_eq!(survivors, expected);
}
