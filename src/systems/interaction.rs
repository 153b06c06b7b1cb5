use bevy::prelude::*;
use bevy::window::{PrimaryWindow, Window};
use bevy_egui::EguiContexts;
use bevy_rts_camera::RtsCamera;

use crate::city::Building;
use crate::config::FLOOR_PANEL_SECONDS;
use crate::systems::city::{CityData, FloorSelection, SelectedFloor};

// ray vs axis aligned box, slab method
// returns the distance along the ray to the entry point, None on a miss or a box behind the ray
pub fn ray_box_hit(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let (o, d) = (origin[axis], direction[axis]);
        if d.abs() < f32::EPSILON {
            // parallel to this slab, must already be inside it
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let t1 = (min[axis] - o) / d;
        let t2 = (max[axis] - o) / d;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(t_near.max(0.0))
}

pub fn building_bounds(building: &Building) -> (Vec3, Vec3) {
    let center = Vec3::from_array(building.position);
    let half = Vec3::new(building.width, building.height, building.depth) / 2.0;
    (center - half, center + half)
}

// zero based floor containing height y, clamped to the building
pub fn floor_at(building: &Building, y: f32) -> u32 {
    let relative = (y - building.bottom()) / building.floor_height();
    (relative.max(0.0) as u32).min(building.floor_count.saturating_sub(1))
}

// closest target building under the ray, with the floor that was hit
pub fn pick_floor(data: &CityData, origin: Vec3, direction: Vec3) -> Option<(&Building, u32)> {
    data.0
        .targets()
        .filter_map(|building| {
            let (min, max) = building_bounds(building);
            ray_box_hit(origin, direction, min, max).map(|t| (building, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(building, t)| {
            let hit = origin + direction * t;
            (building, floor_at(building, hit.y))
        })
}

// left click on a target building selects the floor under the cursor
pub fn handle_floor_picking(
    mut contexts: EguiContexts,
    mut selected_floor: ResMut<SelectedFloor>,
    data: Res<CityData>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }

    // ignore clicks on the egui panels
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.is_pointer_over_area() {
            return;
        }
    }

    let Ok(window) = windows.single() else { return };
    let Ok((camera, camera_transform)) = camera_query.single() else { return };
    let Some(cursor_pos) = window.cursor_position() else { return };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else { return };

    selected_floor.0 = pick_floor(&data, ray.origin, *ray.direction).map(|(building, floor)| {
        info!("Selected {} floor {}", building.id, floor + 1);
        FloorSelection {
            building_id: building.id.clone(),
            floor,
            remaining: FLOOR_PANEL_SECONDS,
        }
    });
}

// floor window closes by itself
pub fn tick_floor_selection(mut selected_floor: ResMut<SelectedFloor>, time: Res<Time>) {
    let Some(selection) = selected_floor.0.as_mut() else {
        return;
    };

    selection.remaining -= time.delta_secs();
    if selection.remaining <= 0.0 {
        selected_floor.0 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::sample_tower;
    use crate::city::RfDataResponse;

    #[test]
    fn ray_hits_box_front_face() {
        let min = Vec3::new(-1.0, -1.0, -1.0);
        let max = Vec3::new(1.0, 1.0, 1.0);

        let t = ray_box_hit(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, min, max).unwrap();
        assert_eq!(t, 9.0);

        // pointing away, and passing beside
        assert!(ray_box_hit(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, min, max).is_none());
        assert!(ray_box_hit(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z, min, max).is_none());

        // origin inside the box
        assert_eq!(ray_box_hit(Vec3::ZERO, Vec3::X, min, max), Some(0.0));
    }

    #[test]
    fn floors_are_clamped_to_the_building() {
        let tower = sample_tower();
        assert_eq!(floor_at(&tower, 0.0), 0);
        assert_eq!(floor_at(&tower, 4.5), 1);
        assert_eq!(floor_at(&tower, -3.0), 0);
        assert_eq!(floor_at(&tower, tower.top()), tower.floor_count - 1);
    }

    #[test]
    fn picks_the_nearest_target() {
        let near = sample_tower();
        let far = Building::new("highrise-1".to_string(), [0.0, -100.0], 50.0, 120.0, 40.0, true);
        let data = CityData(RfDataResponse {
            buildings: vec![far, near],
            rf_points: Vec::new(),
        });

        // horizontal ray at 10m along -z hits both towers
        let (building, floor) = pick_floor(&data, Vec3::new(0.0, 10.0, 100.0), Vec3::NEG_Z).unwrap();
        assert_eq!(building.id, "highrise-0");
        assert_eq!(floor, 3);

        assert!(pick_floor(&data, Vec3::new(0.0, 10.0, 100.0), Vec3::Z).is_none());
    }
}
