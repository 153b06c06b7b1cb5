// samples RF measurement points over the four exterior walls of a building

use super::metrics::MetricModel;
use super::{Building, Metrics, RandomSource, RfPoint};
use crate::config::{HORIZONTAL_LANES, SURFACE_OFFSET, WALL_COUNT};

/// Exterior walls, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Front, // +Z
    Back,  // -Z
    Right, // +X
    Left,  // -X
}

impl Wall {
    pub const ALL: [Self; WALL_COUNT] = [Self::Front, Self::Back, Self::Right, Self::Left];

    pub const fn normal(self) -> [f32; 3] {
        match self {
            Self::Front => [0.0, 0.0, 1.0],
            Self::Back => [0.0, 0.0, -1.0],
            Self::Right => [1.0, 0.0, 0.0],
            Self::Left => [-1.0, 0.0, 0.0],
        }
    }

    /// walls facing along Z run along the building width
    pub const fn faces_z(self) -> bool {
        matches!(self, Self::Front | Self::Back)
    }
}

/// Generates `floor(points_per_building / 4)` points per wall.
///
/// Points climb the wall with their index (`height_ratio = i / points_per_wall`) while cycling
/// through 10 horizontal lanes, and sit `SURFACE_OFFSET` outside the wall plane. Output order is
/// front, back, right, left, each by increasing index; consumers group points by that stride.
pub fn synthesize_points<R: RandomSource + ?Sized>(
    model: &MetricModel,
    building: &Building,
    points_per_building: usize,
    rng: &mut R,
) -> Vec<RfPoint> {
    let points_per_wall = points_per_building / WALL_COUNT;
    let mut points = Vec::with_capacity(points_per_wall * WALL_COUNT);

    let [bx, _, bz] = building.position;
    let half_width = building.width / 2.0;
    let half_depth = building.depth / 2.0;
    let bottom_y = building.bottom();

    for wall in Wall::ALL {
        let [nx, _, nz] = wall.normal();

        for i in 0..points_per_wall {
            let height_ratio = i as f32 / points_per_wall as f32;
            let y = bottom_y + height_ratio * building.height;

            // sawtooth in [-0.5, 0.5)
            let lane = (i % HORIZONTAL_LANES) as f32 / HORIZONTAL_LANES as f32 - 0.5;

            let (x, z) = if wall.faces_z() {
                (bx + lane * building.width, bz + nz * (half_depth + SURFACE_OFFSET))
            } else {
                (bx + nx * (half_width + SURFACE_OFFSET), bz + lane * building.depth)
            };

            points.push(RfPoint {
                id: format!("{}-point-{}", building.id, points.len()),
                building_id: building.id.clone(),
                position: [x, y, z],
                metrics: Metrics::from_fn(|metric| model.synthesize(metric, height_ratio, rng)),
            });
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{sample_tower, SequenceSource};
    use approx::assert_relative_eq;

    #[test]
    fn truncates_to_whole_walls() {
        let tower = sample_tower();
        let mut rng = SequenceSource::constant(0.5);
        let model = MetricModel::default();

        assert_eq!(synthesize_points(&model, &tower, 8, &mut rng).len(), 8);
        assert_eq!(synthesize_points(&model, &tower, 203, &mut rng).len(), 200);
        assert!(synthesize_points(&model, &tower, 3, &mut rng).is_empty());
    }

    #[test]
    fn two_points_per_wall_in_wall_order() {
        let tower = sample_tower();
        let mut rng = SequenceSource::constant(0.5);
        let points = synthesize_points(&MetricModel::default(), &tower, 8, &mut rng);

        let [bx, _, bz] = tower.position;
        let offset_z = tower.depth / 2.0 + SURFACE_OFFSET;
        let offset_x = tower.width / 2.0 + SURFACE_OFFSET;

        // front, back on z; right, left on x
        assert_relative_eq!(points[0].position[2], bz + offset_z);
        assert_relative_eq!(points[1].position[2], bz + offset_z);
        assert_relative_eq!(points[2].position[2], bz - offset_z);
        assert_relative_eq!(points[3].position[2], bz - offset_z);
        assert_relative_eq!(points[4].position[0], bx + offset_x);
        assert_relative_eq!(points[5].position[0], bx + offset_x);
        assert_relative_eq!(points[6].position[0], bx - offset_x);
        assert_relative_eq!(points[7].position[0], bx - offset_x);

        // i = 0 sits on the ground at the first lane, i = 1 halfway up
        assert_relative_eq!(points[0].position[1], 0.0);
        assert_relative_eq!(points[1].position[1], tower.height / 2.0);
        assert_relative_eq!(points[0].position[0], bx - 0.5 * tower.width);
        assert_relative_eq!(points[1].position[0], bx - 0.4 * tower.width, epsilon = 1e-4);
        assert_relative_eq!(points[6].position[2], bz - 0.5 * tower.depth);

        for (n, point) in points.iter().enumerate() {
            assert_eq!(point.id, format!("{}-point-{n}", tower.id));
            assert_eq!(point.building_id, tower.id);
        }
    }

    #[test]
    fn lanes_repeat_every_ten_points() {
        let tower = sample_tower();
        let mut rng = SequenceSource::constant(0.5);
        let points = synthesize_points(&MetricModel::default(), &tower, 200, &mut rng);

        // first 50 are the front wall
        for i in 0..40 {
            assert_relative_eq!(points[i].position[0], points[i + 10].position[0]);
            assert!(points[i + 1].position[1] > points[i].position[1]);
        }
        assert!(points[49].position[1] < tower.top());
    }

    #[test]
    fn metrics_follow_height() {
        let tower = sample_tower();
        let model = MetricModel::default();
        let mut rng = SequenceSource::constant(0.5);
        let points = synthesize_points(&model, &tower, 200, &mut rng);

        // no noise with constant draws, so quality is strictly driven by height
        let ground = points[0].metrics;
        let top = points[49].metrics;
        assert!(top.rssi > ground.rssi);
        assert!(top.snr > ground.snr);
        assert!(top.cqi >= ground.cqi);
    }
}
