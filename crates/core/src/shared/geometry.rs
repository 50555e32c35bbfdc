use imageproc::point::Point;

use super::rect::Rect;

/// A closed polygon over integer pixel coordinates.
///
/// Contours traced from a mask and their convex hulls share this type; the
/// closing edge from the last vertex back to the first is implicit.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Point<i32>>,
}

impl Polygon {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area by the shoelace formula, independent of orientation.
    pub fn area(&self) -> f64 {
        self.moments().m00
    }

    /// Minimal axis-aligned box, counting boundary pixels inclusively
    /// (a single point has width and height 1).
    pub fn bounding_rect(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::new(0.0, 0.0, 0.0, 0.0);
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Rect::new(
            min_x as f64,
            min_y as f64,
            (max_x - min_x + 1) as f64,
            (max_y - min_y + 1) as f64,
        )
    }

    /// Spatial moments of the polygon's interior up to second order,
    /// integrated over the boundary with Green's theorem.
    pub fn moments(&self) -> Moments {
        let n = self.points.len();
        if n < 3 {
            return Moments::default();
        }

        let mut m = Moments::default();
        for (i, p) in self.points.iter().enumerate() {
            let q = self.points[(i + 1) % n];
            let (xi, yi) = (p.x as f64, p.y as f64);
            let (xj, yj) = (q.x as f64, q.y as f64);
            let cross = xi * yj - xj * yi;

            m.m00 += cross;
            m.m10 += (xi + xj) * cross;
            m.m01 += (yi + yj) * cross;
            m.m20 += (xi * xi + xi * xj + xj * xj) * cross;
            m.m02 += (yi * yi + yi * yj + yj * yj) * cross;
            m.m11 += (xi * yj + 2.0 * xi * yi + 2.0 * xj * yj + xj * yi) * cross;
        }
        m.m00 /= 2.0;
        m.m10 /= 6.0;
        m.m01 /= 6.0;
        m.m20 /= 12.0;
        m.m02 /= 12.0;
        m.m11 /= 24.0;

        // Clockwise traversal flips every sign.
        if m.m00 < 0.0 {
            m = Moments {
                m00: -m.m00,
                m10: -m.m10,
                m01: -m.m01,
                m20: -m.m20,
                m02: -m.m02,
                m11: -m.m11,
            };
        }
        m
    }
}

/// Raw spatial moments `m_pq = ∫∫ x^p y^q dA`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m02: f64,
    pub m11: f64,
}

impl Moments {
    /// Center of mass, `None` for a zero-area shape.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 == 0.0 {
            return None;
        }
        Some((self.m10 / self.m00, self.m01 / self.m00))
    }

    pub fn mu20(&self) -> f64 {
        self.central(self.m20, self.m10, self.m10)
    }

    pub fn mu02(&self) -> f64 {
        self.central(self.m02, self.m01, self.m01)
    }

    pub fn mu11(&self) -> f64 {
        self.central(self.m11, self.m10, self.m01)
    }

    fn central(&self, raw: f64, a: f64, b: f64) -> f64 {
        if self.m00 == 0.0 {
            0.0
        } else {
            raw - a * b / self.m00
        }
    }
}
