//! Box-Box Narrow Phase
//!
//! Separating-axis test over the four face normals of two oriented boxes,
//! followed by Sutherland-Hodgman clipping of the incident edge against the
//! side planes of the reference face. Produces 0, 1, or 2 contact points.
//!
//! The normal always points from box A to box B, and feature identifiers are
//! always reported from box A's perspective.

use crate::body::Body;
use crate::contact::{Contact, Edge, FeaturePair, Manifold};
use crate::math::{Fix64, Mat22, Vec2};

/// Hysteresis: a new axis must beat `RELATIVE_TOL * best + ABSOLUTE_TOL * h`.
const RELATIVE_TOL: Fix64 = Fix64::from_raw(4_080_218_931); // 0.95
const ABSOLUTE_TOL: Fix64 = Fix64::from_raw(42_949_673); // 0.01

/// Candidate separating axes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    FaceAX,
    FaceAY,
    FaceBX,
    FaceBY,
}

impl Axis {
    #[inline]
    fn is_face_b(self) -> bool {
        matches!(self, Axis::FaceBX | Axis::FaceBY)
    }

    #[inline]
    fn is_x(self) -> bool {
        matches!(self, Axis::FaceAX | Axis::FaceBX)
    }
}

/// A vertex moving through the clipping pipeline
#[derive(Clone, Copy, Debug, Default)]
struct ClipVertex {
    v: Vec2,
    fp: FeaturePair,
}

/// Pose of one box, prepared once per test
struct BoxFrame {
    pos: Vec2,
    rot: Mat22,
    h: Vec2,
}

impl BoxFrame {
    fn of(body: &Body) -> Self {
        Self {
            pos: body.position,
            rot: body.rotation_matrix(),
            h: body.half_extents(),
        }
    }
}

/// Reference face and the two side planes that bound it
struct ReferenceFace {
    front_normal: Vec2,
    front: Fix64,
    side_normal: Vec2,
    neg_side: Fix64,
    pos_side: Fix64,
    neg_edge: Edge,
    pos_edge: Edge,
}

impl ReferenceFace {
    /// Build the clipping planes for the `x` or `y` face of `frame`, facing
    /// along `front_normal`.
    fn new(frame: &BoxFrame, front_normal: Vec2, along_x: bool) -> Self {
        let (front_extent, side_normal, side_extent, neg_edge, pos_edge) = if along_x {
            (frame.h.x, frame.rot.col2, frame.h.y, Edge::E3, Edge::E1)
        } else {
            (frame.h.y, frame.rot.col1, frame.h.x, Edge::E2, Edge::E4)
        };
        let side = frame.pos.dot(side_normal);
        Self {
            front_normal,
            front: frame.pos.dot(front_normal) + front_extent,
            side_normal,
            neg_side: -side + side_extent,
            pos_side: side + side_extent,
            neg_edge,
            pos_edge,
        }
    }
}

/// Clip a segment against the half-plane `dot(normal, v) <= offset`.
///
/// Returns the surviving vertices and how many there are.
fn clip_segment_to_line(
    v_in: &[ClipVertex; 2],
    normal: Vec2,
    offset: Fix64,
    clip_edge: Edge,
) -> ([ClipVertex; 2], usize) {
    let mut v_out = [ClipVertex::default(); 2];
    let mut num_out = 0;

    // Distance of end points to the line
    let distance0 = normal.dot(v_in[0].v) - offset;
    let distance1 = normal.dot(v_in[1].v) - offset;

    // Points behind the plane survive
    if distance0 <= Fix64::ZERO {
        v_out[num_out] = v_in[0];
        num_out += 1;
    }
    if distance1 <= Fix64::ZERO {
        v_out[num_out] = v_in[1];
        num_out += 1;
    }

    // Points on different sides of the plane: add the crossing
    if distance0.is_negative() != distance1.is_negative()
        && !distance0.is_zero()
        && !distance1.is_zero()
        && num_out < 2
    {
        let interp = distance0 / (distance0 - distance1);
        let mut vertex = ClipVertex {
            v: v_in[0].v + interp * (v_in[1].v - v_in[0].v),
            fp: FeaturePair::default(),
        };
        if distance0.is_positive() {
            vertex.fp = v_in[0].fp;
            vertex.fp.in_edge1 = clip_edge;
            vertex.fp.in_edge2 = Edge::None;
        } else {
            vertex.fp = v_in[1].fp;
            vertex.fp.out_edge1 = clip_edge;
            vertex.fp.out_edge2 = Edge::None;
        }
        v_out[num_out] = vertex;
        num_out += 1;
    }

    (v_out, num_out)
}

/// The edge of the incident box most anti-parallel to the reference normal,
/// in world space.
fn compute_incident_edge(frame: &BoxFrame, normal: Vec2) -> [ClipVertex; 2] {
    // The normal is from the reference box. Convert it to the incident box's
    // frame and flip sign.
    let n = -(frame.rot.transpose() * normal);
    let n_abs = n.abs();
    let h = frame.h;

    // (local vertex, in edge, out edge) for the two ends of the edge
    let ends: [(Vec2, Edge, Edge); 2] = if n_abs.x > n_abs.y {
        if n.x.sign().is_positive() {
            [
                (Vec2::new(h.x, -h.y), Edge::E3, Edge::E4),
                (Vec2::new(h.x, h.y), Edge::E4, Edge::E1),
            ]
        } else {
            [
                (Vec2::new(-h.x, h.y), Edge::E1, Edge::E2),
                (Vec2::new(-h.x, -h.y), Edge::E2, Edge::E3),
            ]
        }
    } else if n.y.sign().is_positive() {
        [
            (Vec2::new(h.x, h.y), Edge::E4, Edge::E1),
            (Vec2::new(-h.x, h.y), Edge::E1, Edge::E2),
        ]
    } else {
        [
            (Vec2::new(-h.x, -h.y), Edge::E2, Edge::E3),
            (Vec2::new(h.x, -h.y), Edge::E3, Edge::E4),
        ]
    };

    ends.map(|(local, in_edge2, out_edge2)| ClipVertex {
        v: frame.pos + frame.rot * local,
        fp: FeaturePair {
            in_edge2,
            out_edge2,
            ..FeaturePair::default()
        },
    })
}

/// Collide two oriented boxes.
///
/// Pure and deterministic. The returned contacts carry geometry and a
/// feature identifier; all impulse fields are zero.
pub fn collide(body_a: &Body, body_b: &Body) -> Manifold {
    let mut manifold = Manifold::new();

    let a = BoxFrame::of(body_a);
    let b = BoxFrame::of(body_b);

    let rot_at = a.rot.transpose();
    let rot_bt = b.rot.transpose();

    let dp = b.pos - a.pos;
    let d_a = rot_at * dp;
    let d_b = rot_bt * dp;

    let c = rot_at * b.rot;
    let abs_c = c.abs();
    let abs_ct = abs_c.transpose();

    // Box A faces
    let face_a = d_a.abs() - a.h - abs_c * b.h;
    if face_a.x.is_positive() || face_a.y.is_positive() {
        return manifold;
    }

    // Box B faces
    let face_b = d_b.abs() - abs_ct * a.h - b.h;
    if face_b.x.is_positive() || face_b.y.is_positive() {
        return manifold;
    }

    // Find best axis, preferring the earlier candidate on near ties
    let mut axis = Axis::FaceAX;
    let mut separation = face_a.x;
    let mut normal = if d_a.x.is_positive() { a.rot.col1 } else { -a.rot.col1 };

    if face_a.y > RELATIVE_TOL * separation + ABSOLUTE_TOL * a.h.y {
        axis = Axis::FaceAY;
        separation = face_a.y;
        normal = if d_a.y.is_positive() { a.rot.col2 } else { -a.rot.col2 };
    }

    if face_b.x > RELATIVE_TOL * separation + ABSOLUTE_TOL * b.h.x {
        axis = Axis::FaceBX;
        separation = face_b.x;
        normal = if d_b.x.is_positive() { b.rot.col1 } else { -b.rot.col1 };
    }

    if face_b.y > RELATIVE_TOL * separation + ABSOLUTE_TOL * b.h.y {
        axis = Axis::FaceBY;
        normal = if d_b.y.is_positive() { b.rot.col2 } else { -b.rot.col2 };
    }

    // Reference face on one box, incident edge on the other
    let (reference, incident_edge) = if axis.is_face_b() {
        let face = ReferenceFace::new(&b, -normal, axis.is_x());
        let edge = compute_incident_edge(&a, face.front_normal);
        (face, edge)
    } else {
        let face = ReferenceFace::new(&a, normal, axis.is_x());
        let edge = compute_incident_edge(&b, face.front_normal);
        (face, edge)
    };

    // Clip to box side 1
    let (clip_points1, np) = clip_segment_to_line(
        &incident_edge,
        -reference.side_normal,
        reference.neg_side,
        reference.neg_edge,
    );
    if np < 2 {
        return manifold;
    }

    // Clip to negative box side 1
    let (clip_points2, np) = clip_segment_to_line(
        &clip_points1,
        reference.side_normal,
        reference.pos_side,
        reference.pos_edge,
    );
    if np < 2 {
        return manifold;
    }

    // Due to roundoff, clipping may still remove all points
    for point in &clip_points2 {
        let separation = reference.front_normal.dot(point.v) - reference.front;
        if separation <= Fix64::ZERO {
            let mut feature = point.fp;
            if axis.is_face_b() {
                feature.flip();
            }
            manifold.push(Contact {
                separation,
                normal,
                // Slide contact point onto reference face
                position: point.v - separation * reference.front_normal,
                feature,
                ..Contact::default()
            });
        }
    }

    manifold
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(x: f64, y: f64) -> Body {
        Body::new(Vec2::from_int(2, 2), Fix64::ONE).with_position(Vec2::from_f64(x, y))
    }

    #[test]
    fn test_disjoint_boxes_have_no_contacts() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(3.0, 0.0);
        assert!(collide(&a, &b).is_empty());
    }

    #[test]
    fn test_overlapping_boxes_two_contacts() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(1.0, 0.0);
        let m = collide(&a, &b);
        assert_eq!(m.len(), 2);
        for c in m.iter() {
            assert_eq!(c.normal, Vec2::UNIT_X);
            assert_eq!(c.separation, Fix64::from_int(-1));
            // Projected onto A's right face
            assert_eq!(c.position.x, Fix64::ONE);
        }
        let ys: Vec<_> = m.iter().map(|c| c.position.y).collect();
        assert!(ys.contains(&Fix64::ONE));
        assert!(ys.contains(&Fix64::NEG_ONE));
    }

    #[test]
    fn test_normal_points_from_a_to_b() {
        let a = unit_box(1.0, 0.0);
        let b = unit_box(0.0, 0.0);
        let m = collide(&a, &b);
        assert_eq!(m.len(), 2);
        assert!(m.iter().all(|c| c.normal == -Vec2::UNIT_X));

        let above = unit_box(0.0, 1.5);
        let m = collide(&b, &above);
        assert!(!m.is_empty());
        assert!(m.iter().all(|c| c.normal == Vec2::UNIT_Y));
    }

    #[test]
    fn test_collide_is_deterministic() {
        let a = unit_box(0.0, 0.0).with_rotation(Fix64::from_f64(0.3));
        let b = unit_box(1.2, 0.9).with_rotation(Fix64::from_f64(-0.2));
        let first = collide(&a, &b);
        let second = collide(&a, &b);
        assert_eq!(first, second);
        let f1: Vec<u32> = first.iter().map(|c| c.feature.value()).collect();
        let f2: Vec<u32> = second.iter().map(|c| c.feature.value()).collect();
        assert_eq!(f1, f2);
    }

    #[test]
    fn test_axis_hysteresis_prefers_a_x_face() {
        let a = unit_box(0.0, 0.0);

        // faceA.y = -0.09 does not beat 0.95 * -0.1 + 0.01: keep A's x face
        let m = collide(&a, &unit_box(1.9, 1.91));
        assert!(!m.is_empty());
        assert!(m.iter().all(|c| c.normal == Vec2::UNIT_X));

        // faceA.y = -0.08 clears the threshold: switch to A's y face
        let m = collide(&a, &unit_box(1.9, 1.92));
        assert!(!m.is_empty());
        assert!(m.iter().all(|c| c.normal == Vec2::UNIT_Y));

        // Mirrored offsets favour x from the start
        let m = collide(&a, &unit_box(1.92, 1.9));
        assert!(!m.is_empty());
        assert!(m.iter().all(|c| c.normal == Vec2::UNIT_X));
    }

    #[test]
    fn test_touching_faces_report_zero_separation() {
        let a = unit_box(0.0, 0.0);
        let b = unit_box(2.0, 0.0);
        let m = collide(&a, &b);
        assert_eq!(m.len(), 2);
        assert!(m.iter().all(|c| c.separation.is_zero()));
    }

    #[test]
    fn test_rotated_corner_single_contact() {
        // Diamond resting its lower corner into a wide floor
        let floor = Body::new_static(Vec2::from_int(20, 2));
        let diamond = Body::new(Vec2::from_int(1, 1), Fix64::ONE)
            .with_position(Vec2::from_f64(0.0, 1.6))
            .with_rotation(Fix64::from_f64(core::f64::consts::FRAC_PI_4));
        let m = collide(&floor, &diamond);
        assert_eq!(m.len(), 1);
        let c = m.as_slice()[0];
        assert!(c.separation.is_negative());
        assert!((c.normal.y.to_f64() - 1.0).abs() < 1e-6);
        assert!(c.position.x.to_f64().abs() < 1e-3);
    }

    #[test]
    fn test_feature_ids_independent_of_reference_box() {
        // A tilted small box sinking into a wide one: the wide box's top face
        // is the reference in both argument orders, so with the small box
        // first the ids must be flipped back into its perspective.
        let big = Body::new_static(Vec2::from_int(10, 2));
        let small = unit_box(0.0, 1.85).with_rotation(Fix64::from_f64(0.1));
        let ab = collide(&big, &small);
        let ba = collide(&small, &big);
        assert_eq!(ab.len(), 2);
        assert_eq!(ba.len(), 2);

        let mut ids_ab: Vec<(Edge, Edge, Edge, Edge)> = ab
            .iter()
            .map(|c| {
                let f = c.feature;
                (f.in_edge2, f.out_edge2, f.in_edge1, f.out_edge1)
            })
            .collect();
        let mut ids_ba: Vec<(Edge, Edge, Edge, Edge)> = ba
            .iter()
            .map(|c| {
                let f = c.feature;
                (f.in_edge1, f.out_edge1, f.in_edge2, f.out_edge2)
            })
            .collect();
        ids_ab.sort();
        ids_ba.sort();
        assert_eq!(ids_ab, ids_ba);
    }

    #[test]
    fn test_clip_segment_crossing_tags_edge() {
        let v_in = [
            ClipVertex {
                v: Vec2::from_int(-2, 0),
                fp: FeaturePair::default(),
            },
            ClipVertex {
                v: Vec2::from_int(2, 0),
                fp: FeaturePair {
                    in_edge2: Edge::E4,
                    out_edge2: Edge::E1,
                    ..FeaturePair::default()
                },
            },
        ];
        let (out, n) = clip_segment_to_line(&v_in, Vec2::UNIT_X, Fix64::ONE, Edge::E3);
        assert_eq!(n, 2);
        assert_eq!(out[0].v, Vec2::from_int(-2, 0));
        assert_eq!(out[1].v, Vec2::from_int(1, 0));
        assert_eq!(out[1].fp.out_edge1, Edge::E3);
        assert_eq!(out[1].fp.out_edge2, Edge::None);
        assert_eq!(out[1].fp.in_edge2, Edge::E4);
    }

    #[test]
    fn test_clip_segment_fully_outside() {
        let v_in = [
            ClipVertex {
                v: Vec2::from_int(3, 0),
                fp: FeaturePair::default(),
            },
            ClipVertex {
                v: Vec2::from_int(4, 0),
                fp: FeaturePair::default(),
            },
        ];
        let (_, n) = clip_segment_to_line(&v_in, Vec2::UNIT_X, Fix64::ONE, Edge::E1);
        assert_eq!(n, 0);
    }
}
