use bevy::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}; // fps
use bevy::pbr::wireframe::WireframeConfig;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};

use crate::city::metrics::{to_hex, ColorScheme, RangeProfile};
use crate::city::stats::{floor_averages, overall_average, MetricSummary};
use crate::city::{MetricModel, MetricType, QualityLevel};
use crate::systems::city::{
    CityData, LayoutOverlay, MetricChangeEvent, Params, RegenerateEvent, Seed, SelectedFloor, SelectedMetric,
};
use crate::systems::export::{ExportEvent, ExportFormat};

pub mod indicator;

// re-export the main items that other modules need
pub use indicator::{render_metric_indicator, update_metric_indicator, MetricIndicator};

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app
            .insert_resource(MetricIndicator::default())
            .add_systems(Update, (key_input, update_metric_indicator))
            .add_systems(EguiPrimaryContextPass, (ui_main, fps, floor_window, render_metric_indicator)); // UI rendering here
    }
}

pub fn to_color32([r, g, b]: [f32; 3]) -> egui::Color32 {
    let channel = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    egui::Color32::from_rgb(channel(r), channel(g), channel(b))
}

fn quality_color(model: &MetricModel, quality: QualityLevel) -> egui::Color32 {
    let t = match quality {
        QualityLevel::Excellent => 1.0,
        QualityLevel::Good => 0.66,
        QualityLevel::Fair => 0.33,
        QualityLevel::Poor => 0.0,
    };
    to_color32(model.color_at(t))
}

// metric hotkeys, 1-5 in MetricType order
const METRIC_KEYS: [KeyCode; 5] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4, KeyCode::Digit5];

fn key_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut overlay: ResMut<LayoutOverlay>,
    mut regen_events: EventWriter<RegenerateEvent>,
    mut metric_events: EventWriter<MetricChangeEvent>,
) {
    if keyboard_input.just_pressed(KeyCode::Tab) {
        overlay.0 = !overlay.0;
    }

    if keyboard_input.just_pressed(KeyCode::KeyR) {
        regen_events.write(RegenerateEvent { seed: rand::random() });
    }

    for (key, metric) in METRIC_KEYS.into_iter().zip(MetricType::ALL) {
        if keyboard_input.just_pressed(key) {
            metric_events.write(MetricChangeEvent(Some(metric)));
        }
    }
    if keyboard_input.just_pressed(KeyCode::Digit0) {
        metric_events.write(MetricChangeEvent(None));
    }
}

fn ui_main(
    mut contexts: EguiContexts,
    current_seed: Res<Seed>,
    mut params: ResMut<Params>,
    mut wireframe: ResMut<WireframeConfig>,
    data: Res<CityData>,
    selected: Res<SelectedMetric>,
    mut regen_events: EventWriter<RegenerateEvent>,
    mut metric_events: EventWriter<MetricChangeEvent>,
    mut export_events: EventWriter<ExportEvent>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::SidePanel::left("config_panel")
            .default_width(260.0)
            .min_width(250.0)
            .max_width(400.0)
            .resizable(true)
            .show(ctx, |ui| {
                let mut regenerate = false;
                let mut recolor = false;

                // camera
                ui.label("Camera: ");
                ui.label("WASD - Move");
                ui.label("Scroll - Zoom");
                ui.label("MMB - Rotate");
                ui.label("LMB - Inspect floor");

                ui.separator();

                egui::CollapsingHeader::new("City")
                    .default_open(true)
                    .show(ui, |ui| {
                    ui.label(format!("Seed: {}", current_seed.0));
                    ui.label(format!(
                        "{} buildings, {} targets, {} RF points",
                        data.0.buildings.len(),
                        data.0.targets().count(),
                        data.0.rf_points.len()
                    ));

                    if ui.button("Regenerate (R)").clicked() {
                        regen_events.write(RegenerateEvent { seed: rand::random() });
                    }

                    regenerate |= ui.add(egui::Slider::new(&mut params.city.points_per_building, 4..=400)
                        .step_by(4.0)
                        .text("Points per building"))
                        .on_hover_text("Spread evenly over the four walls, so only multiples of 4 are used.")
                        .changed();

                    ui.checkbox(&mut params.show_background, "Background buildings");
                    ui.checkbox(&mut params.show_bands, "Signal bands");
                    ui.checkbox(&mut wireframe.global, "Wireframe");
                });

                egui::CollapsingHeader::new("Metric Model")
                    .default_open(false)
                    .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Ranges:");
                        regenerate |= ui.radio_value(&mut params.model.profile, RangeProfile::Narrow, "Narrow").changed();
                        regenerate |= ui.radio_value(&mut params.model.profile, RangeProfile::Broad, "Broad").changed();
                    });
                    ui.horizontal(|ui| {
                        ui.label("Colors:");
                        recolor |= ui.radio_value(&mut params.model.colors, ColorScheme::RgbLerp, "RGB").changed();
                        recolor |= ui.radio_value(&mut params.model.colors, ColorScheme::HueSweep, "Hue").changed();
                    });
                });

                ui.separator();

                // metric selection
                ui.label("Metric (1-5, 0 to reset):");
                ui.horizontal_wrapped(|ui| {
                    for metric in MetricType::ALL {
                        let range = params.model.range_of(metric);
                        let is_selected = selected.0 == Some(metric);
                        if ui.selectable_label(is_selected, range.display_name)
                            .on_hover_text(range.description)
                            .clicked()
                        {
                            // clicking the active metric turns coloring off
                            let next = if is_selected { None } else { Some(metric) };
                            metric_events.write(MetricChangeEvent(next));
                        }
                    }
                });
                if ui.add_enabled(selected.0.is_some(), egui::Button::new("Reset")).clicked() {
                    metric_events.write(MetricChangeEvent(None));
                }

                ui.separator();

                let model = params.model;
                if let Some((normalized, quality)) = overall_average(&model, &data.0.rf_points) {
                    ui.horizontal(|ui| {
                        ui.label("Overall signal:");
                        ui.label(egui::RichText::new(format!("{:.0}% ({})", normalized * 100.0, quality))
                            .color(quality_color(&model, quality))
                            .strong());
                    });
                }

                if let Some(metric) = selected.0 {
                    let range = model.range_of(metric);
                    if let Some(summary) = MetricSummary::from_points(&model, &data.0.rf_points, metric) {
                        egui::Grid::new("metric_summary").num_columns(2).show(ui, |ui| {
                            ui.label("Average");
                            ui.label(egui::RichText::new(format!("{:.1} {}", summary.average, range.unit))
                                .color(quality_color(&model, summary.quality)));
                            ui.end_row();
                            ui.label("Min");
                            ui.label(format!("{:.1} {}", summary.min, range.unit));
                            ui.end_row();
                            ui.label("Max");
                            ui.label(format!("{:.1} {}", summary.max, range.unit));
                            ui.end_row();
                        });
                    }

                    // same metric, tower by tower
                    egui::Grid::new("target_summary").num_columns(2).show(ui, |ui| {
                        for building in data.0.targets() {
                            let Some(summary) = MetricSummary::from_points(&model, data.0.points_of(&building.id), metric) else {
                                continue;
                            };
                            ui.label(&building.id);
                            ui.label(egui::RichText::new(format!("{:.1} {} ({})", summary.average, range.unit, summary.quality))
                                .color(quality_color(&model, summary.quality)));
                            ui.end_row();
                        }
                    });

                    legend(ui, &model, metric);
                }

                ui.separator();

                // export section
                ui.horizontal(|ui| {
                    if ui.button("Export JSON")
                        .on_hover_text("Save buildings and RF points, current directory")
                        .clicked() {
                        export_events.write(ExportEvent::timestamped(ExportFormat::Json));
                    }
                    if ui.button("Export OBJ")
                        .on_hover_text("Export scene as OBJ file, current directory")
                        .clicked() {
                        export_events.write(ExportEvent::timestamped(ExportFormat::Obj));
                    }
                });

                ui.separator();
                ui.label("TAB - Layout overlay");
                ui.label("ESC - Exit");

                // triggere regeneration on any generation parameter change, same seed
                if regenerate {
                    regen_events.write(RegenerateEvent { seed: current_seed.0 });
                } else if recolor {
                    metric_events.write(MetricChangeEvent(selected.0));
                }
            });
    }
}

// gradient bar from the poor to the good end of the range
fn legend(ui: &mut egui::Ui, model: &MetricModel, metric: MetricType) {
    const STEPS: usize = 24;
    let range = model.range_of(metric);

    let (rect, response) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 14.0), egui::Sense::hover());
    response.on_hover_text(format!("{} to {}", to_hex(model.poor_color()), to_hex(model.good_color())));
    let step_width = rect.width() / STEPS as f32;
    for i in 0..STEPS {
        let t = i as f32 / (STEPS - 1) as f32;
        let left = rect.left() + step_width * i as f32;
        let step = egui::Rect::from_min_size(egui::pos2(left, rect.top()), egui::vec2(step_width + 0.5, rect.height()));
        ui.painter().rect_filled(step, 0.0, to_color32(model.color_at(t)));
    }

    ui.horizontal(|ui| {
        ui.label(format!("{} {}", range.min, range.unit));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(format!("{} {}", range.max, range.unit));
        });
    });
}

// per floor averages of the picked floor, closes on its own
fn floor_window(
    mut contexts: EguiContexts,
    selected_floor: Res<SelectedFloor>,
    data: Res<CityData>,
    params: Res<Params>,
) {
    let Some(selection) = &selected_floor.0 else {
        return;
    };
    let Some(building) = data.0.building(&selection.building_id) else {
        return;
    };
    let Some(floor) = floor_averages(building, &data.0.rf_points)
        .into_iter()
        .find(|f| f.floor == selection.floor)
    else {
        return;
    };

    if let Ok(ctx) = contexts.ctx_mut() {
        let model = params.model;
        egui::Window::new("Floor metrics")
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-10.0, -10.0))
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(&building.id).strong());
                ui.label(format!("Floor {} of {}", floor.floor + 1, building.floor_count));
                ui.label(format!("{} measurement point(s)", floor.point_count));
                ui.separator();

                let Some(metrics) = floor.metrics else {
                    ui.label("No measurements on this floor");
                    return;
                };

                egui::Grid::new("floor_metrics").num_columns(2).show(ui, |ui| {
                    for metric in MetricType::ALL {
                        let range = model.range_of(metric);
                        let value = metrics.get(metric);
                        ui.label(range.display_name);
                        ui.label(egui::RichText::new(format!("{:.1} {}", value, range.unit))
                            .color(quality_color(&model, model.quality_level(value, metric))));
                        ui.end_row();
                    }
                });
                ui.label(egui::RichText::new(format!("closes in {:.0}s", selection.remaining.ceil())).small());
            });
    }
}

fn fps(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Area::new(egui::Id::new("fps_counter"))
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-10.0, 10.0))
            .show(ctx, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::RIGHT), |ui| {
                    if let Some(fps) = diagnostics
                        .get(&FrameTimeDiagnosticsPlugin::FPS)
                        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
                    {
                        ui.label(egui::RichText::new(format!("{:.0} fps", fps))
                            .size(20.0)
                            .color(egui::Color32::WHITE));
                    }
                });
            });
    }
}
