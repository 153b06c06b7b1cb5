use bevy::log::debug;

use super::utils::{planar_distance, Footprint};
use super::{Building, RandomSource, Span};
use crate::config::*;

/// City layout generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    // towers
    pub tower_anchors: [[f32; 2]; TOWER_COUNT],
    pub tower_height: Span,
    pub tower_footprint: Span,
    // background buildings
    pub lowrise_count_min: usize,
    pub lowrise_count_spread: usize,
    pub lowrise_height: Span,
    pub lowrise_footprint: Span,
    // placement grid
    pub grid_columns: usize,
    pub grid_spacing: Span,
    pub grid_jitter: f32,
    // constraints
    pub ground_half_extent: f32,
    pub boundary_margin: f32,
    pub tower_clearance: f32,
    pub footprint_margin: f32,
    pub max_attempts: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            tower_anchors: TOWER_ANCHORS,
            tower_height: Span::new(TOWER_HEIGHT_MIN, TOWER_HEIGHT_SPREAD),
            tower_footprint: Span::new(TOWER_FOOTPRINT_MIN, TOWER_FOOTPRINT_SPREAD),
            lowrise_count_min: LOWRISE_COUNT_MIN,
            lowrise_count_spread: LOWRISE_COUNT_SPREAD,
            lowrise_height: Span::new(LOWRISE_HEIGHT_MIN, LOWRISE_HEIGHT_SPREAD),
            lowrise_footprint: Span::new(LOWRISE_FOOTPRINT_MIN, LOWRISE_FOOTPRINT_SPREAD),
            grid_columns: GRID_COLUMNS,
            grid_spacing: Span::new(GRID_SPACING_MIN, GRID_SPACING_SPREAD),
            grid_jitter: GRID_JITTER,
            ground_half_extent: GROUND_HALF_EXTENT,
            boundary_margin: BOUNDARY_MARGIN,
            tower_clearance: TOWER_CLEARANCE,
            footprint_margin: FOOTPRINT_MARGIN,
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

impl LayoutParams {
    /// Usable half extent once the boundary margin is taken off.
    pub fn buildable_half_extent(&self) -> f32 {
        self.ground_half_extent - self.boundary_margin
    }

    // keep the whole footprint inside the buildable square
    fn clamp_to_ground(&self, x: f32, z: f32, width: f32, depth: f32) -> (f32, f32) {
        let limit = self.buildable_half_extent();
        let limit_x = (limit - width / 2.0).max(0.0);
        let limit_z = (limit - depth / 2.0).max(0.0);
        (x.clamp(-limit_x, limit_x), z.clamp(-limit_z, limit_z))
    }
}

/// Generates the three target towers followed by the background buildings that could be placed.
///
/// Background candidates that find no valid spot within `max_attempts` are dropped, so the
/// background count can be lower than drawn and `lowrise-{i}` ids can have gaps.
pub fn generate_layout<R: RandomSource + ?Sized>(params: &LayoutParams, rng: &mut R) -> Vec<Building> {
    let mut buildings = Vec::new();

    for (i, &anchor) in params.tower_anchors.iter().enumerate() {
        let height = params.tower_height.sample(rng);
        let side = params.tower_footprint.sample(rng);

        buildings.push(Building::new(format!("highrise-{i}"), anchor, side, height, side, true));
    }

    let towers: Vec<Footprint> = buildings.iter().map(Building::footprint).collect();
    let mut placed: Vec<Footprint> = Vec::new();

    let lowrise_count = params.lowrise_count_min
        + (rng.unit() * params.lowrise_count_spread as f32).floor() as usize;

    for i in 0..lowrise_count {
        let height = params.lowrise_height.sample(rng);
        let width = params.lowrise_footprint.sample(rng);
        let depth = params.lowrise_footprint.sample(rng);

        // grid cell is fixed by the sequence number, only spacing and jitter get re-rolled
        let columns = params.grid_columns.max(1);
        let grid_x = (i % columns) as f32 - (columns / 2) as f32;
        let grid_z = (i / columns) as f32 - 1.0;

        let mut spot = None;
        for attempt in 0..params.max_attempts {
            let spacing = params.grid_spacing.sample(rng);
            let jitter_x = (rng.unit() - 0.5) * params.grid_jitter;
            let jitter_z = (rng.unit() - 0.5) * params.grid_jitter;

            let (x, z) = params.clamp_to_ground(
                grid_x * spacing + jitter_x,
                grid_z * spacing + jitter_z,
                width,
                depth,
            );
            let footprint = Footprint::centered(x, z, width, depth);

            if is_valid_placement(params, &footprint, &towers, &placed) {
                debug!("lowrise-{i} placed after {} attempt(s)", attempt + 1);
                spot = Some(([x, z], footprint));
                break;
            }
        }

        let Some((center, footprint)) = spot else {
            debug!("lowrise-{i} skipped, no valid spot in {} attempts", params.max_attempts);
            continue;
        };

        placed.push(footprint);
        buildings.push(Building::new(format!("lowrise-{i}"), center, width, height, depth, false));
    }

    buildings
}

/// A candidate is valid when it keeps `tower_clearance` from every tower anchor and its
/// footprint, grown by `footprint_margin`, overlaps neither a tower nor an accepted building.
pub fn is_valid_placement(
    params: &LayoutParams,
    candidate: &Footprint,
    towers: &[Footprint],
    placed: &[Footprint],
) -> bool {
    let center = candidate.center();
    if params
        .tower_anchors
        .iter()
        .any(|&anchor| planar_distance(center, anchor) < params.tower_clearance)
    {
        return false;
    }

    let grown = candidate.expanded(params.footprint_margin);
    !towers.iter().chain(placed).any(|other| grown.overlaps(other))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::SequenceSource;

    #[test]
    fn towers_come_first_at_their_anchors() {
        let params = LayoutParams::default();
        let mut rng = SequenceSource::constant(0.5);
        let buildings = generate_layout(&params, &mut rng);

        for (i, anchor) in params.tower_anchors.iter().enumerate() {
            let tower = &buildings[i];
            assert_eq!(tower.id, format!("highrise-{i}"));
            assert!(tower.is_target);
            assert_eq!([tower.position[0], tower.position[2]], *anchor);
            assert_eq!(tower.height, 115.0);
            assert_eq!(tower.width, tower.depth);
        }
    }

    #[test]
    fn cell_on_a_tower_is_skipped_and_leaves_an_id_gap() {
        // constant draws give zero jitter, so the candidate at grid (0, 0) sits on the center tower
        let params = LayoutParams::default();
        let mut rng = SequenceSource::constant(0.5);
        let buildings = generate_layout(&params, &mut rng);

        // 0.5 * 4 -> 2 extra, 14 candidates
        let lowrise: Vec<&str> = buildings.iter().filter(|b| !b.is_target).map(|b| b.id.as_str()).collect();
        assert!(!lowrise.contains(&"lowrise-9"));
        assert!(lowrise.iter().all(|id| id.starts_with("lowrise-")));
        assert!(lowrise.len() < 14);
    }

    #[test]
    fn candidates_stay_inside_the_buildable_square() {
        let params = LayoutParams {
            grid_spacing: Span::new(400.0, 0.0),
            tower_anchors: [[1000.0, 1000.0], [1100.0, 1000.0], [1000.0, 1100.0]],
            ..LayoutParams::default()
        };
        let mut rng = SequenceSource::constant(0.5);
        let limit = params.buildable_half_extent();

        for building in generate_layout(&params, &mut rng).iter().filter(|b| !b.is_target) {
            let footprint = building.footprint();
            assert!(footprint.min_x >= -limit && footprint.max_x <= limit, "{}", building.id);
            assert!(footprint.min_z >= -limit && footprint.max_z <= limit, "{}", building.id);
        }
    }

    #[test]
    fn rejects_candidates_near_towers_or_neighbours() {
        let params = LayoutParams::default();
        let towers = vec![Footprint::centered(0.0, 0.0, 50.0, 50.0)];

        let near_anchor = Footprint::centered(40.0, 40.0, 10.0, 10.0);
        assert!(!is_valid_placement(&params, &near_anchor, &towers, &[]));

        let free = Footprint::centered(100.0, 0.0, 10.0, 10.0);
        assert!(is_valid_placement(&params, &free, &towers, &[]));

        // 2m gap to the neighbour, under the 4m margin
        let neighbour = Footprint::centered(112.0, 0.0, 10.0, 10.0);
        assert!(!is_valid_placement(&params, &free, &towers, &[neighbour]));
    }
}
