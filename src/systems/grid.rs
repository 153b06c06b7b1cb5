use bevy::prelude::*;
use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::math::Isometry3d;

use crate::config::{BOUNDARY_MARGIN, GROUND_HALF_EXTENT};

// ground reference grid over the city square
// so user can read distances between buildings, and see the ground boundary
pub struct GridPlugin;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct GridGizmoGroup;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(GridConfig::default())
            .init_gizmo_group::<GridGizmoGroup>()
            .add_systems(Startup, setup_gizmos)
            .add_systems(Update, draw_grid);
    }
}

// setting theese parameters as a resource allows for runtime modifications
#[derive(Resource)]
pub struct GridConfig {
    pub major_spacing: f32,
    pub minor_spacing: f32,
    pub major_color: Color,
    pub minor_color: Color,
    pub boundary_color: Color,
    pub half_extent: f32,
    pub margin: f32,
    pub enabled: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            major_spacing: 50.0,
            minor_spacing: 10.0,
            major_color: Color::srgba(0.9, 0.9, 0.9, 0.25),
            minor_color: Color::srgba(0.7, 0.7, 0.7, 0.1),
            boundary_color: Color::srgba(0.71, 0.24, 0.24, 0.6),
            half_extent: GROUND_HALF_EXTENT,
            margin: BOUNDARY_MARGIN,
            enabled: true,
        }
    }
}

fn setup_gizmos(
    mut config_store: ResMut<GizmoConfigStore>
) {
    let (config, _) = config_store.config_mut::<GridGizmoGroup>();
    config.depth_bias = 0.1; // render depth
}

// grid line coordinates from -extent to +extent, multiples of spacing only
pub fn grid_lines(extent: f32, spacing: f32) -> Vec<f32> {
    if spacing <= 0.0 {
        return Vec::new();
    }
    let count = (extent / spacing).floor() as i32;
    (-count..=count).map(|i| i as f32 * spacing).collect()
}

fn draw_grid(
    mut gizmos: Gizmos<GridGizmoGroup>,
    params: Res<GridConfig>,
) {
    if !params.enabled {
        return;
    }

    // slightly above the ground plane so the lines do not z-fight with it
    let y = 0.02;
    let extent = params.half_extent;

    for (spacing, color) in [
        (params.minor_spacing, params.minor_color),
        (params.major_spacing, params.major_color),
    ] {
        for offset in grid_lines(extent, spacing) {
            // minor pass skips the ones that would be major
            if spacing == params.minor_spacing && (offset % params.major_spacing).abs() < f32::EPSILON {
                continue;
            }
            gizmos.line(Vec3::new(offset, y, -extent), Vec3::new(offset, y, extent), color);
            gizmos.line(Vec3::new(-extent, y, offset), Vec3::new(extent, y, offset), color);
        }
    }

    // ground edge and the inner line buildings have to stay behind
    for half in [extent, extent - params.margin] {
        gizmos.rect(
            Isometry3d::new(Vec3::new(0.0, y, 0.0), Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
            Vec2::splat(half * 2.0),
            params.boundary_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_symmetric_multiples() {
        assert_eq!(grid_lines(250.0, 50.0), vec![-250.0, -200.0, -150.0, -100.0, -50.0, 0.0, 50.0, 100.0, 150.0, 200.0, 250.0]);
        assert_eq!(grid_lines(25.0, 10.0), vec![-20.0, -10.0, 0.0, 10.0, 20.0]);
        assert!(grid_lines(10.0, 0.0).is_empty());
    }
}
