// entry point of the generation core
// layout -> per target building point synthesis -> per point metric synthesis
use bevy::log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{FLOOR_HEIGHT, POINTS_PER_BUILDING};

pub mod cosmetic;
pub mod layout;
pub mod metrics;
pub mod points;
pub mod stats;
pub mod utils;

pub use layout::{generate_layout, LayoutParams};
pub use metrics::{MetricModel, MetricType, QualityLevel};
pub use points::synthesize_points;

/// Source of uniform draws for every random decision in the core.
///
/// Implemented for any [`rand::Rng`], so production code passes `&mut rand::rng()`
/// and tests can pass a fixed-sequence stub instead.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// `min + U(0,1) * spread`, the shape of every randomized dimension in the layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f32,
    pub spread: f32,
}

impl Span {
    pub const fn new(min: f32, spread: f32) -> Self {
        Self { min, spread }
    }

    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + rng.unit() * self.spread
    }
}

/// A generated building, ground anchored, axis aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: String,
    /// centroid, so `position[1] == height / 2`
    pub position: [f32; 3],
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub is_target: bool,
    pub floor_count: u32,
}

impl Building {
    /// Builds a ground-anchored building centered on `(x, z)`.
    pub fn new(id: String, [x, z]: [f32; 2], width: f32, height: f32, depth: f32, is_target: bool) -> Self {
        Self {
            id,
            position: [x, height / 2.0, z],
            width,
            height,
            depth,
            is_target,
            floor_count: floors_for_height(height),
        }
    }

    pub fn bottom(&self) -> f32 {
        self.position[1] - self.height / 2.0
    }

    pub fn top(&self) -> f32 {
        self.position[1] + self.height / 2.0
    }

    /// real storey height, differs slightly from FLOOR_HEIGHT after rounding the count
    pub fn floor_height(&self) -> f32 {
        self.height / self.floor_count.max(1) as f32
    }

    pub fn footprint(&self) -> utils::Footprint {
        utils::Footprint::centered(self.position[0], self.position[2], self.width, self.depth)
    }
}

pub fn floors_for_height(height: f32) -> u32 {
    ((height / FLOOR_HEIGHT).round() as u32).max(1)
}

/// One value per tracked metric, already in final units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub rssi: f32,
    pub cqi: f32,
    pub rsrp: f32,
    pub rsrq: f32,
    pub snr: f32,
}

impl Metrics {
    pub fn from_fn(mut f: impl FnMut(MetricType) -> f32) -> Self {
        // field order is also the draw order during synthesis
        Self {
            rssi: f(MetricType::Rssi),
            cqi: f(MetricType::Cqi),
            rsrp: f(MetricType::Rsrp),
            rsrq: f(MetricType::Rsrq),
            snr: f(MetricType::Snr),
        }
    }

    pub const fn get(&self, metric: MetricType) -> f32 {
        match metric {
            MetricType::Rssi => self.rssi,
            MetricType::Cqi => self.cqi,
            MetricType::Rsrp => self.rsrp,
            MetricType::Rsrq => self.rsrq,
            MetricType::Snr => self.snr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfPoint {
    /// `{building_id}-point-{n}`, n counts across all four walls
    pub id: String,
    pub building_id: String,
    pub position: [f32; 3],
    pub metrics: Metrics,
}

/// The full generated payload, serialized as `{ "buildings": [...], "rfPoints": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfDataResponse {
    pub buildings: Vec<Building>,
    pub rf_points: Vec<RfPoint>,
}

impl RfDataResponse {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn targets(&self) -> impl Iterator<Item = &Building> {
        self.buildings.iter().filter(|b| b.is_target)
    }

    pub fn building(&self, id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub fn points_of<'a>(&'a self, building_id: &'a str) -> impl Iterator<Item = &'a RfPoint> + 'a {
        self.rf_points.iter().filter(move |p| p.building_id == building_id)
    }
}

/// Failure body for request-serving consumers: `{ "error": ..., "message"?: ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn generation_failed(message: Option<String>) -> Self {
        Self {
            error: "Failed to generate RF data".to_string(),
            message,
        }
    }
}

// everything a single generation pass needs
#[derive(Debug, Clone, PartialEq)]
pub struct CityParams {
    pub layout: LayoutParams,
    pub points_per_building: usize,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            layout: LayoutParams::default(),
            points_per_building: POINTS_PER_BUILDING,
        }
    }
}

/// Generates a fresh city and the RF points of its target buildings.
///
/// Nothing is cached, every call redoes the full random generation.
pub fn generate_city_rf_data<R: RandomSource + ?Sized>(
    model: &MetricModel,
    params: &CityParams,
    rng: &mut R,
) -> RfDataResponse {
    let buildings = generate_layout(&params.layout, rng);

    let mut rf_points = Vec::new();
    for building in buildings.iter().filter(|b| b.is_target) {
        rf_points.extend(synthesize_points(model, building, params.points_per_building, rng));
    }

    info!(
        "Generated city with {} buildings and {} RF points",
        buildings.len(),
        rf_points.len()
    );

    RfDataResponse { buildings, rf_points }
}

/// Default model and parameters, thread-local unseeded randomness.
pub fn generate() -> RfDataResponse {
    generate_city_rf_data(&MetricModel::default(), &CityParams::default(), &mut rand::rng())
}
