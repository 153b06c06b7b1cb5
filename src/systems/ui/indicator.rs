use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::city::MetricType;
use crate::systems::city::{MetricChangeEvent, Params};
use super::to_color32;

// fading banner shown when the colored metric changes
#[derive(Resource)]
pub struct MetricIndicator {
    pub metric: Option<MetricType>,
    pub timer: f32,
    pub duration: f32,
}

impl Default for MetricIndicator {
    fn default() -> Self {
        Self {
            metric: None,
            timer: 0.0,
            duration: 2.0,
        }
    }
}

pub fn update_metric_indicator(
    mut indicator: ResMut<MetricIndicator>,
    mut events: EventReader<MetricChangeEvent>,
    time: Res<Time>,
) {
    for event in events.read() {
        // recolor requests for the same metric don't flash the banner
        if event.0 != indicator.metric {
            indicator.metric = event.0;
            indicator.timer = indicator.duration;
        }
    }

    if indicator.timer > 0.0 {
        indicator.timer = (indicator.timer - time.delta_secs()).max(0.0);
    }
}

pub fn render_metric_indicator(
    indicator: Res<MetricIndicator>,
    params: Res<Params>,
    mut contexts: EguiContexts,
) {
    if indicator.timer <= 0.0 {
        return;
    }

    if let Ok(ctx) = contexts.ctx_mut() {
        let alpha = (indicator.timer / indicator.duration).clamp(0.0, 1.0);
        let fade = |value: f32| (value * alpha) as u8;

        let (title, subtitle, bg_color) = match indicator.metric {
            Some(metric) => {
                let range = params.model.range_of(metric);
                (range.display_name, range.description, to_color32(params.model.good_color()))
            }
            None => ("NO METRIC", "markers reset", egui::Color32::from_rgb(40, 44, 52)),
        };

        egui::Area::new(egui::Id::new("metric_indicator"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 60.0))
            .show(ctx, |ui| {
                let frame = egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(
                        bg_color.r() / 2, bg_color.g() / 2, bg_color.b() / 2,
                        fade(200.0)
                    ))
                    .stroke(egui::Stroke::new(
                        2.0,
                        egui::Color32::from_rgba_unmultiplied(255, 255, 255, fade(200.0))
                    ))
                    .inner_margin(egui::Margin::symmetric(20, 10))
                    .corner_radius(egui::CornerRadius::same(8));

                frame.show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(title)
                            .size(18.0)
                            .color(egui::Color32::from_rgba_unmultiplied(255, 255, 255, fade(255.0)))
                            .strong());
                        ui.label(egui::RichText::new(subtitle)
                            .size(12.0)
                            .color(egui::Color32::from_rgba_unmultiplied(220, 220, 220, fade(255.0))));
                    });
                });
            });
    }
}
