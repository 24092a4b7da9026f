use crate::graph::CollisionLines;
use crate::line::{LineId, LineMask, Point};

/// Nearest intersection found by [`CollisionLines::ray_cast`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RayHit {
    pub point: Point,
    pub line: LineId,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

#[inline]
fn cross(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ax * by - ay * bx
}

impl CollisionLines {
    /// Cast the segment `from -> to` against every line whose type is in `mask`.
    ///
    /// Returns the hit closest to `from`. Parallel and collinear lines never
    /// count as hits; on equal distances the line earliest in sorted order wins.
    pub fn ray_cast(&self, from: Point, to: Point, mask: LineMask) -> Option<RayHit> {
        let rx = to.x - from.x;
        let ry = to.y - from.y;
        let ray_length = rx.hypot(ry);

        let mut nearest: Option<RayHit> = None;

        for (id, line) in self.iter() {
            if !mask.contains(line.line_type) {
                continue;
            }

            let sx = line.p2.x - line.p1.x;
            let sy = line.p2.y - line.p1.y;
            let denom = cross(rx, ry, sx, sy);
            if denom == 0.0 {
                continue;
            }

            let qx = line.p1.x - from.x;
            let qy = line.p1.y - from.y;
            let t = cross(qx, qy, sx, sy) / denom;
            let u = cross(qx, qy, rx, ry) / denom;
            if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
                continue;
            }

            let distance = t * ray_length;
            if nearest.is_some_and(|hit| hit.distance <= distance) {
                continue;
            }
            nearest = Some(RayHit {
                point: Point::new(from.x + t * rx, from.y + t * ry),
                line: id,
                distance,
            });
        }

        nearest
    }
}
