//! Demo Scenes
//!
//! Classic box scenarios as deterministic world builders. Every scene starts
//! with a wide static ground whose top face lies on `y = 0`.

use crate::body::Body;
use crate::math::{Fix64, Vec2};
use crate::world::World;

/// Horizontal jitter for the vertical stack in hundredths, fixed so runs are reproducible
const STACK_OFFSETS: [i64; 10] = [4, -7, 2, 9, -3, -8, 6, 1, -5, 3];

/// Friction of the ramp boxes in hundredths
const RAMP_FRICTIONS: [i64; 5] = [75, 50, 35, 10, 0];

/// Built-in scenario
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scene {
    /// One heavy box dropped onto the ground
    SingleBox,
    /// Five boxes of decreasing friction sliding down tilted ramps
    FrictionRamp,
    /// Ten boxes stacked on top of each other
    VerticalStack,
    /// Twelve-row pyramid
    Pyramid,
}

impl Scene {
    /// All scenes, in demo order
    pub const ALL: [Scene; 4] = [
        Scene::SingleBox,
        Scene::FrictionRamp,
        Scene::VerticalStack,
        Scene::Pyramid,
    ];

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Scene::SingleBox => "A Single Box",
            Scene::FrictionRamp => "Friction",
            Scene::VerticalStack => "A Vertical Stack",
            Scene::Pyramid => "A Pyramid",
        }
    }

    /// Build a fresh world populated with this scene
    pub fn build(self) -> World {
        let mut world = World::default();
        self.populate(&mut world);
        log::debug!("Built scene '{}' ({} bodies)", self.name(), world.body_count());
        world
    }

    /// Add this scene's bodies to an existing world
    pub fn populate(self, world: &mut World) {
        world.add(ground());
        match self {
            Scene::SingleBox => {
                world.add(
                    Body::new(Vec2::from_int(1, 1), Fix64::from_int(200))
                        .with_position(Vec2::from_int(0, 4)),
                );
            }
            Scene::FrictionRamp => friction_ramp(world),
            Scene::VerticalStack => vertical_stack(world),
            Scene::Pyramid => pyramid(world),
        }
    }
}

fn ground() -> Body {
    Body::new_static(Vec2::from_int(100, 20)).with_position(Vec2::from_int(0, -10))
}

/// `(x / den, y / den)` without going through floats
fn ratio_vec(x: i64, y: i64, den: i64) -> Vec2 {
    Vec2::new(Fix64::from_ratio(x, den), Fix64::from_ratio(y, den))
}

fn friction_ramp(world: &mut World) {
    let ramp = |x: i32, y: i32, angle: Fix64| {
        Body::new_static(ratio_vec(52, 1, 4))
            .with_position(Vec2::from_int(x, y))
            .with_rotation(angle)
    };
    let wall = |position: Vec2| Body::new_static(ratio_vec(1, 4, 4)).with_position(position);
    let tilt = Fix64::from_ratio(1, 4);

    world.add(ramp(-2, 11, -tilt));
    world.add(wall(ratio_vec(21, 38, 4)));
    world.add(ramp(2, 7, tilt));
    world.add(wall(ratio_vec(-21, 22, 4)));
    world.add(ramp(-2, 3, -tilt));

    for (i, &friction) in RAMP_FRICTIONS.iter().enumerate() {
        world.add(
            Body::new(ratio_vec(1, 1, 2), Fix64::from_int(25))
                .with_friction(Fix64::from_ratio(friction, 100))
                .with_position(ratio_vec(-15 + 4 * i as i64, 28, 2)),
        );
    }
}

fn vertical_stack(world: &mut World) {
    for (i, &dx) in STACK_OFFSETS.iter().enumerate() {
        world.add(
            Body::new(Vec2::from_int(1, 1), Fix64::ONE)
                .with_position(ratio_vec(dx, 51 + 105 * i as i64, 100)),
        );
    }
}

fn pyramid(world: &mut World) {
    let mut x = ratio_vec(-24, 3, 4);
    let row_step = ratio_vec(9, 32, 16);
    let col_step = ratio_vec(9, 0, 8);

    for i in 0..12 {
        let mut y = x;
        for _ in i..12 {
            world.add(
                Body::new(Vec2::from_int(1, 1), Fix64::from_int(10)).with_position(y),
            );
            y += col_step;
        }
        x += row_step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_body_counts() {
        assert_eq!(Scene::SingleBox.build().body_count(), 2);
        assert_eq!(Scene::FrictionRamp.build().body_count(), 11);
        assert_eq!(Scene::VerticalStack.build().body_count(), 11);
        // 12 + 11 + ... + 1 boxes plus ground
        assert_eq!(Scene::Pyramid.build().body_count(), 79);
    }

    #[test]
    fn test_scene_names_unique() {
        for (i, a) in Scene::ALL.iter().enumerate() {
            for b in &Scene::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_first_body_is_static_ground() {
        for scene in Scene::ALL {
            let world = scene.build();
            assert!(world.bodies()[0].is_static(), "{}", scene.name());
        }
    }

    #[test]
    fn test_ramp_frictions_decrease() {
        let world = Scene::FrictionRamp.build();
        let boxes: Vec<_> = world.bodies().iter().filter(|b| !b.is_static()).collect();
        assert_eq!(boxes.len(), 5);
        for pair in boxes.windows(2) {
            assert!(pair[0].friction > pair[1].friction);
        }
    }

    #[test]
    fn test_layout_uses_exact_fractions() {
        let pyramid = Scene::Pyramid.build();
        let first = pyramid.bodies()[1].position;
        assert_eq!(first.x, Fix64::from_int(-6));
        assert_eq!(first.y.raw(), 3 << 30);
        // Second row starts half a box in and two units up
        let second_row = pyramid.bodies()[13].position;
        assert_eq!(second_row, Vec2::new(Fix64::from_ratio(-87, 16), Fix64::from_ratio(11, 4)));

        let ramp = Scene::FrictionRamp.build();
        let boxes: Vec<_> = ramp.bodies().iter().filter(|b| !b.is_static()).collect();
        assert_eq!(boxes[2].friction, Fix64::from_ratio(35, 100));
        assert_eq!(boxes[0].position, Vec2::new(Fix64::from_ratio(-15, 2), Fix64::from_int(14)));
        assert_eq!(ramp.bodies()[1].rotation, -Fix64::from_ratio(1, 4));

        let stack = Scene::VerticalStack.build();
        assert_eq!(stack.bodies()[10].position.y, Fix64::from_ratio(996, 100));
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = Scene::Pyramid.build();
        let b = Scene::Pyramid.build();
        assert_eq!(a.bodies(), b.bodies());
    }
}
