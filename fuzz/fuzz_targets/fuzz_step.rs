#![no_main]
use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use fixbox2d::{Body, Fix64, SolverConfig, Vec2, World};

#[derive(Debug, Arbitrary)]
struct FuzzBody {
    /// Position (i8 keeps bodies close enough to touch)
    x: i8,
    y: i8,
    /// Full size in 1/16 units
    w: u8,
    h: u8,
    /// Mass; zero makes the body static
    mass: u8,
    /// Orientation in 1/64 radians
    angle: i8,
    /// Friction in 1/16 units
    friction: u8,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    bodies: Vec<FuzzBody>,
    accumulate_impulses: bool,
    warm_starting: bool,
    position_correction: bool,
    /// Number of simulation steps (capped)
    step_count: u8,
    /// Relaxation sweeps (capped)
    iterations: u8,
    /// Timestep numerator over 600; zero and negative steps are allowed
    dt: i8,
}

// Add arbitrary boxes and step the world: must never panic.
fuzz_target!(|input: FuzzInput| {
    let mut world = World::new(Vec2::from_int(0, -10), (input.iterations as usize).min(20));
    world.solver = SolverConfig {
        accumulate_impulses: input.accumulate_impulses,
        warm_starting: input.warm_starting,
        position_correction: input.position_correction,
    };

    let sixteenth = Fix64::from_int(16);
    for fb in input.bodies.iter().take(16) {
        let width = Vec2::new(
            Fix64::from_int(fb.w as i32 + 1) / sixteenth,
            Fix64::from_int(fb.h as i32 + 1) / sixteenth,
        );
        let body = Body::new(width, Fix64::from_int(fb.mass as i32))
            .with_position(Vec2::from_int(fb.x as i32, fb.y as i32))
            .with_rotation(Fix64::from_ratio(fb.angle as i64, 64))
            .with_friction(Fix64::from_int(fb.friction as i32) / sixteenth);
        world.add(body);
    }

    let dt = Fix64::from_ratio(input.dt as i64, 600);
    for _ in 0..(input.step_count as usize).min(32) {
        world.step(dt);
    }
    let _ = world.try_step(dt);

    assert!(world.arbiters().all(|(_, arb)| arb.num_contacts() > 0));
});
