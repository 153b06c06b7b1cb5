use bevy::prelude::*;
use bevy::math::bounding::Aabb2d;
use bevy::pbr::wireframe::{WireframePlugin, WireframeConfig};
use bevy::window::{WindowPlugin, PrimaryWindow};
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::gizmos::config::{GizmoConfigStore, DefaultGizmoConfigGroup};
use bevy_egui::EguiPlugin;
use bevy_rts_camera::*;

use rf_city::config::GROUND_HALF_EXTENT;

// import modules here
use rf_city::systems::city::CityPlugin;
use rf_city::systems::grid::GridPlugin;
use rf_city::systems::interaction;
use rf_city::systems::ui::UIPlugin;

fn main() -> bevy::app::AppExit {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "RF City".to_string(),
                mode: bevy::window::WindowMode::Windowed,
                resolution: bevy::window::WindowResolution::new(1920.0, 1080.0),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(WireframePlugin::default())
        .add_plugins(RtsCameraPlugin)

        // my custom plugins
        .add_plugins(GridPlugin)
        .add_plugins(CityPlugin)
        .add_plugins(UIPlugin)

        .insert_resource(WireframeConfig {
            global: false, // toggled from the side panel
            default_color: Color::BLACK,
        })
        .insert_resource(ClearColor(Color::srgb(0.05, 0.06, 0.08))) // sky color
        .insert_resource(AmbientLight {
            brightness: 400.0,
            ..default()
        })
        .add_systems(Startup, (start, setup_gizmos, maximize_window))
        .add_systems(Update, (
            handle_exit,
            interaction::handle_floor_picking,
            interaction::tick_floor_selection,
        ))
        .run()
}

fn setup_gizmos(
    mut config_store: ResMut<GizmoConfigStore>
) {
    let (config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    config.depth_bias = -1.0; // render on top of everything else
}

fn maximize_window(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    for mut window in windows.iter_mut() {
        window.set_maximized(true);
    }
}

// application entry point here
fn start(
    mut commands: Commands
) {
    info!("Starting RF city viewer");

    // spawn camera, bounded to the ground square
    commands.spawn((
        RtsCamera {
            bounds: Aabb2d::new(
                Vec2::ZERO,
                Vec2::splat(GROUND_HALF_EXTENT),
            ),
            min_angle: 0.5,
            height_max: 600.0,
            ..default()
        },
        RtsCameraControls {
            key_up: KeyCode::KeyW,
            key_down: KeyCode::KeyS,
            key_left: KeyCode::KeyA,
            key_right: KeyCode::KeyD,
            key_rotate_left: KeyCode::F24, // rotation stays on the middle mouse button
            key_rotate_right: KeyCode::F23,
            pan_speed: 120.0,
            zoom_sensitivity: 0.15,
            edge_pan_width: 0.0,
            ..default()
        },
    ));

    // spawn light source
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(300.0, 500.0, 200.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// application exit
fn handle_exit(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
