// this is the entry point for the city viewer plugin
use bevy::prelude::*;

use crate::city::utils::Footprint;
use crate::city::{CityParams, MetricModel, MetricType, RfDataResponse};
use crate::config::*;
use crate::systems::export::{handle_export, ExportEvent};

pub mod mesh_gen;
pub mod scene;

// resources
#[derive(Resource)]
pub struct Seed(pub u64);

// last generated payload, read by the ui and the picking system
#[derive(Resource, Default)]
pub struct CityData(pub RfDataResponse);

#[derive(Resource, Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct SelectedMetric(pub Option<MetricType>);

#[derive(Clone, PartialEq, Debug)]
pub struct FloorSelection {
    pub building_id: String,
    pub floor: u32,
    pub remaining: f32, // seconds until the floor window closes
}

#[derive(Resource, Default)]
pub struct SelectedFloor(pub Option<FloorSelection>);

// placement debug overlay (tab)
#[derive(Resource, Default)]
pub struct LayoutOverlay(pub bool);

// Event for regeneration
#[derive(Event)]
pub struct RegenerateEvent {
    pub seed: u64,
}

// Event for switching the colored metric, None = neutral markers
#[derive(Event, Clone, Copy)]
pub struct MetricChangeEvent(pub Option<MetricType>);

// viewer parameters
#[derive(Resource)]
pub struct Params {
    pub city: CityParams,
    pub model: MetricModel,
    pub marker_radius: f32,
    pub show_background: bool,
    pub show_bands: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            city: CityParams::default(),
            model: MetricModel::default(),
            marker_radius: MARKER_RADIUS,
            show_background: true,
            show_bands: true,
        }
    }
}

// main plugin for the city scene
pub struct CityPlugin;

impl Plugin for CityPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(Seed(INITIAL_SEED))
            .insert_resource(Params::default())
            .init_resource::<CityData>()
            .init_resource::<SelectedMetric>()
            .init_resource::<SelectedFloor>()
            .init_resource::<LayoutOverlay>()

            .add_event::<RegenerateEvent>()
            .add_event::<MetricChangeEvent>()
            .add_event::<ExportEvent>()

            .add_systems(Startup, scene::setup_city)
            .add_systems(Update, (
                scene::handle_regeneration,
                // metric first, so a regeneration in the same frame already uses it
                scene::apply_metric_change.before(scene::handle_regeneration),
                scene::update_visibility,
                scene::draw_target_outlines,
                layout_overlay,
                handle_export,
            ));
    }
}

fn layout_overlay(
    mut gizmos: Gizmos,
    overlay: Res<LayoutOverlay>,
    params: Res<Params>,
    data: Res<CityData>,
) {
    if !overlay.0 {
        return;
    }

    let layout = &params.city.layout;
    let y = 0.05;

    // buildable area
    let limit = layout.buildable_half_extent();
    draw_rect(&mut gizmos, &Footprint::centered(0.0, 0.0, limit * 2.0, limit * 2.0), y, Color::srgba(0.71, 0.24, 0.24, 0.8));

    // tower exclusion zones
    for anchor in layout.tower_anchors {
        let steps = 48;
        gizmos.linestrip(
            (0..=steps).map(|i| {
                let angle = i as f32 / steps as f32 * std::f32::consts::TAU;
                Vec3::new(
                    anchor[0] + angle.cos() * layout.tower_clearance,
                    y,
                    anchor[1] + angle.sin() * layout.tower_clearance,
                )
            }),
            Color::srgba(1.0, 0.5, 0.0, 0.7),
        );
    }

    // footprints and the margin every neighbour has to respect
    for building in &data.0.buildings {
        let footprint = building.footprint();
        let color = if building.is_target {
            Color::srgba(1.0, 1.0, 0.0, 0.8)
        } else {
            Color::srgba(0.18, 0.28, 0.45, 0.9)
        };
        draw_rect(&mut gizmos, &footprint, y, color);
        draw_rect(&mut gizmos, &footprint.expanded(layout.footprint_margin), y, color.with_alpha(0.3));
    }
}

fn draw_rect(gizmos: &mut Gizmos, rect: &Footprint, y: f32, color: Color) {
    gizmos.linestrip(
        [
            Vec3::new(rect.min_x, y, rect.min_z),
            Vec3::new(rect.max_x, y, rect.min_z),
            Vec3::new(rect.max_x, y, rect.max_z),
            Vec3::new(rect.min_x, y, rect.max_z),
            Vec3::new(rect.min_x, y, rect.min_z),
        ],
        color,
    );
}
