// UTILS

/// Axis aligned rectangle in the X/Z plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Footprint {
    /// footprint of a `width` (x) by `depth` (z) rectangle centered on `(x, z)`
    pub fn centered(x: f32, z: f32, width: f32, depth: f32) -> Self {
        Self {
            min_x: x - width / 2.0,
            max_x: x + width / 2.0,
            min_z: z - depth / 2.0,
            max_z: z + depth / 2.0,
        }
    }

    /// Grows the rectangle by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min_x: self.min_x - margin,
            max_x: self.max_x + margin,
            min_z: self.min_z - margin,
            max_z: self.max_z + margin,
        }
    }

    /// Strict overlap test, rectangles that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_z < other.max_z
            && self.max_z > other.min_z
    }

    /// Shortest distance between the two rectangles, 0.0 when they overlap or touch.
    pub fn gap(&self, other: &Self) -> f32 {
        let dx = (other.min_x - self.max_x).max(self.min_x - other.max_x).max(0.0);
        let dz = (other.min_z - self.max_z).max(self.min_z - other.max_z).max(0.0);
        (dx * dx + dz * dz).sqrt()
    }

    pub fn center(&self) -> [f32; 2] {
        [(self.min_x + self.max_x) / 2.0, (self.min_z + self.max_z) / 2.0]
    }
}

/// Euclidean distance in the X/Z plane
pub fn planar_distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    let dx = a[0] - b[0];
    let dz = a[1] - b[1];
    (dx * dx + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn touching_rectangles_do_not_overlap() {
        let a = Footprint::centered(0.0, 0.0, 10.0, 10.0);
        let b = Footprint::centered(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.expanded(0.5).overlaps(&b));
        assert_relative_eq!(a.gap(&b), 0.0);
    }

    #[test]
    fn gap_is_corner_to_corner_for_diagonal_neighbours() {
        let a = Footprint::centered(0.0, 0.0, 2.0, 2.0);
        let b = Footprint::centered(5.0, 5.0, 2.0, 2.0);
        assert_relative_eq!(a.gap(&b), (3.0f32 * 3.0 * 2.0).sqrt(), epsilon = 1e-5);
        assert_relative_eq!(b.gap(&a), a.gap(&b));
    }

    #[test]
    fn expanded_keeps_center() {
        let footprint = Footprint::centered(3.0, -4.0, 6.0, 2.0).expanded(4.0);
        assert_eq!(footprint.center(), [3.0, -4.0]);
        assert_relative_eq!(footprint.max_x - footprint.min_x, 14.0);
        assert_relative_eq!(planar_distance([0.0, 0.0], [3.0, 4.0]), 5.0);
    }
}
