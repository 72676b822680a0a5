#![no_main]
use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use fixbox2d::{collide, Body, Fix64, Vec2, MAX_POINTS};

#[derive(Debug, Arbitrary)]
struct BoxInput {
    /// Center, in 1/256 units
    x: i16,
    y: i16,
    /// Full size, in 1/256 units (zero allowed)
    w: u16,
    h: u16,
    /// Orientation, raw fixed-point
    angle: i64,
}

#[derive(Debug, Arbitrary)]
struct CollisionInput {
    a: BoxInput,
    b: BoxInput,
}

fn make_box(input: &BoxInput) -> Body {
    let scale = Fix64::from_int(256);
    Body::new(
        Vec2::new(
            Fix64::from_int(input.w as i32) / scale,
            Fix64::from_int(input.h as i32) / scale,
        ),
        Fix64::ONE,
    )
    .with_position(Vec2::new(
        Fix64::from_int(input.x as i32) / scale,
        Fix64::from_int(input.y as i32) / scale,
    ))
    .with_rotation(Fix64::from_raw(input.angle))
}

// Narrow phase on arbitrary boxes: must never panic, never report more than
// MAX_POINTS contacts, and must be repeatable.
fuzz_target!(|input: CollisionInput| {
    let a = make_box(&input.a);
    let b = make_box(&input.b);

    let first = collide(&a, &b);
    assert!(first.len() <= MAX_POINTS);
    assert_eq!(first, collide(&a, &b));

    let reversed = collide(&b, &a);
    assert!(reversed.len() <= MAX_POINTS);
});
