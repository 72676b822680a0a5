//! Run every built-in scene for a few seconds and print the final body poses.
//!
//! ```text
//! RUST_LOG=debug cargo run --example box_demo [steps]
//! ```

use fixbox2d::{Fix64, Scene};

fn main() {
    env_logger::init();

    let steps: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(180);
    let dt = Fix64::from_ratio(1, 60);

    for scene in Scene::ALL {
        let mut world = scene.build();
        for _ in 0..steps {
            world.step(dt);
        }

        println!(
            "== {} after {} steps: {} arbiters, {} contacts",
            scene.name(),
            steps,
            world.arbiter_count(),
            world.contact_count()
        );
        for (handle, body) in world.handles().zip(world.bodies()) {
            if body.is_static() {
                continue;
            }
            println!(
                "  body {:>3}: pos = ({:>8.3}, {:>8.3})  rot = {:>7.3}  vel = ({:>7.3}, {:>7.3})",
                handle.index(),
                body.position.x.to_f64(),
                body.position.y.to_f64(),
                body.rotation.to_f64(),
                body.velocity.x.to_f64(),
                body.velocity.y.to_f64()
            );
        }
    }
}
