use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::city::cosmetic::Cosmetics;
use crate::city::stats::height_profile;
use crate::city::{generate_city_rf_data, Building, Metrics};

const GROUND_COLOR: Color = Color::srgb_u8(0x80, 0x80, 0x80);
const TARGET_COLOR: Color = Color::srgb_u8(0xc0, 0xc0, 0xc0);
const BUILDING_COLOR: Color = Color::srgb_u8(0x60, 0x60, 0x60);
const TARGET_ROOF_COLOR: Color = Color::srgb_u8(0xa8, 0xa8, 0xa8);
const ROOF_COLOR: Color = Color::srgb_u8(0x50, 0x50, 0x50);
const OUTLINE_COLOR: Color = Color::srgb(1.0, 0.85, 0.2);

// entity hierarchy components
#[derive(Component)]
pub struct City {
    pub seed: u64,
}

#[derive(Component)]
pub struct CityBuilding {
    pub id: String,
    pub is_target: bool,
}

#[derive(Component)]
pub struct BackgroundBuilding;

// index into CityData rf_points
#[derive(Component)]
pub struct RfMarker(pub usize);

#[derive(Component)]
pub struct SignalBand;

pub fn setup_city(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    seed: Res<Seed>,
    params: Res<Params>,
    selected: Res<SelectedMetric>,
    mut data: ResMut<CityData>,
) {
    data.0 = generate_city(&mut commands, &mut meshes, &mut materials, seed.0, &params, selected.0);
}

// one full pass: generate the payload, then spawn the scene for it
pub fn generate_city(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    seed: u64,
    params: &Params,
    metric: Option<MetricType>,
) -> RfDataResponse {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = generate_city_rf_data(&params.model, &params.city, &mut rng);

    let city_entity = commands
        .spawn((City { seed }, Transform::default(), Visibility::default()))
        .id();

    // ground plane
    let half = params.city.layout.ground_half_extent;
    let ground = commands
        .spawn((
            Mesh3d(meshes.add(Plane3d::default().mesh().size(half * 2.0, half * 2.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: GROUND_COLOR,
                perceptual_roughness: 0.95,
                ..default()
            })),
            Transform::default(),
        ))
        .id();
    commands.entity(city_entity).add_children(&[ground]);

    for building in &data.buildings {
        let entity = spawn_building(commands, meshes, materials, building, params.show_background);
        commands.entity(city_entity).add_children(&[entity]);
    }

    // markers share one sphere mesh, each keeps its own material so it can be recolored
    let sphere = meshes.add(Sphere::new(params.marker_radius));
    let mut markers = Vec::with_capacity(data.rf_points.len());
    for (i, point) in data.rf_points.iter().enumerate() {
        let material = materials.add(StandardMaterial {
            base_color: marker_color(&params.model, metric, &point.metrics),
            unlit: true,
            ..default()
        });
        markers.push(
            commands
                .spawn((
                    RfMarker(i),
                    Mesh3d(sphere.clone()),
                    MeshMaterial3d(material),
                    Transform::from_translation(Vec3::from_array(point.position)),
                ))
                .id(),
        );
    }
    commands.entity(city_entity).add_children(&markers);

    if let Some(metric) = metric {
        spawn_signal_bands(commands, meshes, materials, city_entity, &data, params, metric);
    }

    data
}

fn spawn_building(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    building: &Building,
    show_background: bool,
) -> Entity {
    let look = Cosmetics::for_building(building);
    let (body_color, roof_color) = if building.is_target {
        (TARGET_COLOR, TARGET_ROOF_COLOR)
    } else {
        // background blocks are translucent
        (BUILDING_COLOR.with_alpha(0.85), ROOF_COLOR.with_alpha(0.85))
    };
    let alpha_mode = if building.is_target { AlphaMode::Opaque } else { AlphaMode::Blend };

    let body = materials.add(StandardMaterial {
        base_color: body_color,
        perceptual_roughness: look.roughness,
        metallic: look.metallic,
        alpha_mode,
        ..default()
    });
    let roof = materials.add(StandardMaterial {
        base_color: roof_color,
        perceptual_roughness: look.roughness,
        alpha_mode,
        ..default()
    });

    let mut entity = commands.spawn((
        CityBuilding {
            id: building.id.clone(),
            is_target: building.is_target,
        },
        Mesh3d(meshes.add(Cuboid::new(building.width, building.height, building.depth))),
        MeshMaterial3d(body),
        Transform::from_translation(Vec3::from_array(building.position)),
    ));
    if !building.is_target {
        entity.insert((
            BackgroundBuilding,
            if show_background { Visibility::Visible } else { Visibility::Hidden },
        ));
    }
    let building_entity = entity.id();

    // rooftop block, relative to the building center
    let roof_entity = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(look.roof_width, look.roof_height, look.roof_depth))),
            MeshMaterial3d(roof),
            Transform::from_xyz(0.0, (building.height + look.roof_height) / 2.0, 0.0),
        ))
        .id();
    commands.entity(building_entity).add_children(&[roof_entity]);

    building_entity
}

fn spawn_signal_bands(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    city_entity: Entity,
    data: &RfDataResponse,
    params: &Params,
    metric: MetricType,
) {
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        cull_mode: None,
        ..default()
    });

    for building in data.targets() {
        let profile = height_profile(&params.model, building, &data.rf_points, metric, SIGNAL_BAND_BINS);
        let band = commands
            .spawn((
                SignalBand,
                Mesh3d(meshes.add(mesh_gen::signal_band(
                    building,
                    &profile,
                    &params.model,
                    SIGNAL_BAND_WIDTH,
                    SIGNAL_BAND_OFFSET,
                ))),
                MeshMaterial3d(material.clone()),
                Transform::default(),
                if params.show_bands { Visibility::Visible } else { Visibility::Hidden },
            ))
            .id();
        commands.entity(city_entity).add_children(&[band]);
    }
}

/// White when no metric is selected, otherwise the model color of the point's value.
pub fn marker_color(model: &MetricModel, metric: Option<MetricType>, metrics: &Metrics) -> Color {
    match metric {
        Some(metric) => {
            let [r, g, b] = model.color_for(metrics.get(metric), metric);
            Color::srgb(r, g, b)
        }
        None => Color::WHITE,
    }
}

pub fn handle_regeneration(
    mut commands: Commands,
    mut events: EventReader<RegenerateEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut seed: ResMut<Seed>,
    mut data: ResMut<CityData>,
    mut selected_floor: ResMut<SelectedFloor>,
    params: Res<Params>,
    selected: Res<SelectedMetric>,
    query: Query<Entity, With<City>>,
) {
    // several requests in one frame collapse into the last one
    let Some(event) = events.read().last() else {
        return;
    };

    // cleanup existing city
    for entity in query.iter() {
        commands.entity(entity).try_despawn();
    }

    seed.0 = event.seed;
    data.0 = generate_city(&mut commands, &mut meshes, &mut materials, event.seed, &params, selected.0);
    selected_floor.0 = None;

    debug!("Regenerated city with seed {}", event.seed);
}

// recolor markers and rebuild the signal bands for the new metric
pub fn apply_metric_change(
    mut commands: Commands,
    mut events: EventReader<MetricChangeEvent>,
    mut selected: ResMut<SelectedMetric>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    data: Res<CityData>,
    params: Res<Params>,
    markers: Query<(&RfMarker, &MeshMaterial3d<StandardMaterial>)>,
    bands: Query<Entity, With<SignalBand>>,
    city: Query<Entity, With<City>>,
) {
    let Some(event) = events.read().last().copied() else {
        return;
    };
    selected.0 = event.0;

    for (marker, material) in markers.iter() {
        let Some(point) = data.0.rf_points.get(marker.0) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = marker_color(&params.model, event.0, &point.metrics);
        }
    }

    for entity in bands.iter() {
        commands.entity(entity).try_despawn();
    }
    if let (Some(metric), Ok(city_entity)) = (event.0, city.single()) {
        spawn_signal_bands(&mut commands, &mut meshes, &mut materials, city_entity, &data.0, &params, metric);
    }
}

pub fn update_visibility(
    params: Res<Params>,
    mut background: Query<&mut Visibility, (With<BackgroundBuilding>, Without<SignalBand>)>,
    mut bands: Query<&mut Visibility, (With<SignalBand>, Without<BackgroundBuilding>)>,
) {
    if !params.is_changed() {
        return;
    }

    let visibility = |shown: bool| if shown { Visibility::Visible } else { Visibility::Hidden };
    for mut v in background.iter_mut() {
        *v = visibility(params.show_background);
    }
    for mut v in bands.iter_mut() {
        *v = visibility(params.show_bands);
    }
}

// highlight the target buildings, plus the floor picked with the mouse
pub fn draw_target_outlines(
    mut gizmos: Gizmos,
    data: Res<CityData>,
    selected_floor: Res<SelectedFloor>,
) {
    for building in data.0.targets() {
        gizmos.cuboid(
            Transform::from_translation(Vec3::from_array(building.position))
                .with_scale(Vec3::new(building.width, building.height, building.depth) * 1.002),
            OUTLINE_COLOR,
        );
    }

    let Some(selection) = &selected_floor.0 else {
        return;
    };
    let Some(building) = data.0.building(&selection.building_id) else {
        return;
    };

    let floor_height = building.floor_height();
    let center = Vec3::new(
        building.position[0],
        building.bottom() + floor_height * (selection.floor as f32 + 0.5),
        building.position[2],
    );
    gizmos.cuboid(
        Transform::from_translation(center)
            .with_scale(Vec3::new(building.width + 1.0, floor_height, building.depth + 1.0)),
        Color::srgb(0.0, 1.0, 1.0),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_are_white_without_a_metric() {
        let model = MetricModel::default();
        let metrics = Metrics { rssi: -50.0, ..Metrics::default() };

        assert_eq!(marker_color(&model, None, &metrics), Color::WHITE);

        let [r, g, b] = model.good_color();
        assert_eq!(marker_color(&model, Some(MetricType::Rssi), &metrics), Color::srgb(r, g, b));
    }
}
