use super::Point2d;
use cgmath::prelude::*;

/// The smallest squared segment length used as a projection denominator.
pub const MIN_PLANAR_NORM: f64 = 1e-12;

/// The result of projecting a point onto a line segment.
#[derive(Clone, Copy, Debug)]
pub struct SegmentProjection {
    /// The parameter of the projected point along the segment, in `[0, 1]`.
    pub t: f64,
    /// The squared distance between the point and its projection.
    pub dist2: f64,
}

/// Projects a point onto the line segment from `a` to `b`,
/// clamping the projection to the segment's end points.
pub fn project_onto_segment(point: Point2d, a: Point2d, b: Point2d) -> SegmentProjection {
    let v = b - a;
    let w = point - a;
    let vv = v.magnitude2();
    let vv = if vv == 0.0 { MIN_PLANAR_NORM } else { vv };
    let t = (w.dot(v) / vv).clamp(0.0, 1.0);
    let projected = a + v * t;
    SegmentProjection {
        t,
        dist2: (point - projected).magnitude2(),
    }
}
