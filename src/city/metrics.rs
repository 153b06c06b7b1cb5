// metric model: ranges, normalization, quality buckets, colors
// plus the height correlated synthesizer that draws one value per metric

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::RandomSource;
use crate::error::Error;

/// The closed set of tracked RF metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Rssi,
    Cqi,
    Rsrp,
    Rsrq,
    Snr,
}

impl MetricType {
    pub const ALL: [Self; 5] = [Self::Rssi, Self::Cqi, Self::Rsrp, Self::Rsrq, Self::Snr];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Rssi => "rssi",
            Self::Cqi => "cqi",
            Self::Rsrp => "rsrp",
            Self::Rsrq => "rsrq",
            Self::Snr => "snr",
        }
    }

    /// cqi is reported as a whole index, the rest with one decimal
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Cqi)
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MetricType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownMetric(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    pub min: f32,
    pub max: f32,
    pub unit: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
}

impl MetricRange {
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

// indexed by MetricType::index
static NARROW_RANGES: [MetricRange; 5] = [
    MetricRange { min: -85.0, max: -50.0, unit: "dBm", display_name: "RSSI", description: "Received Signal Strength Indicator" },
    MetricRange { min: 0.0, max: 15.0, unit: "", display_name: "CQI", description: "Channel Quality Indicator" },
    MetricRange { min: -110.0, max: -80.0, unit: "dBm", display_name: "RSRP", description: "Reference Signal Received Power" },
    MetricRange { min: -15.0, max: -5.0, unit: "dB", display_name: "RSRQ", description: "Reference Signal Received Quality" },
    MetricRange { min: 0.0, max: 20.0, unit: "dB", display_name: "SNR", description: "Signal-to-Noise Ratio" },
];

static BROAD_RANGES: [MetricRange; 5] = [
    MetricRange { min: -120.0, max: -40.0, unit: "dBm", display_name: "RSSI", description: "Received Signal Strength Indicator" },
    MetricRange { min: 0.0, max: 15.0, unit: "", display_name: "CQI", description: "Channel Quality Indicator" },
    MetricRange { min: -140.0, max: -44.0, unit: "dBm", display_name: "RSRP", description: "Reference Signal Received Power" },
    MetricRange { min: -20.0, max: -3.0, unit: "dB", display_name: "RSRQ", description: "Reference Signal Received Quality" },
    MetricRange { min: -10.0, max: 30.0, unit: "dB", display_name: "SNR", description: "Signal-to-Noise Ratio" },
];

/// Which range table the model uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangeProfile {
    /// typical urban LTE readings
    #[default]
    Narrow,
    /// full reportable spans
    Broad,
}

impl RangeProfile {
    pub fn table(self) -> &'static [MetricRange; 5] {
        match self {
            Self::Narrow => &NARROW_RANGES,
            Self::Broad => &BROAD_RANGES,
        }
    }
}

/// How a normalized value becomes a color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorScheme {
    /// straight RGB lerp between POOR_COLOR and GOOD_COLOR
    #[default]
    RgbLerp,
    /// HSL hue from red (0 deg) to green (120 deg)
    HueSweep,
}

// red-400 and green-400
pub const POOR_COLOR: [f32; 3] = [0xf8 as f32 / 255.0, 0x71 as f32 / 255.0, 0x71 as f32 / 255.0];
pub const GOOD_COLOR: [f32; 3] = [0x4a as f32 / 255.0, 0xde as f32 / 255.0, 0x80 as f32 / 255.0];

const HUE_SATURATION: f32 = 0.75;
const HUE_LIGHTNESS: f32 = 0.6;
const HUE_GOOD_DEGREES: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityLevel {
    pub fn from_normalized(normalized: f32) -> Self {
        if normalized >= 0.75 {
            Self::Excellent
        } else if normalized >= 0.5 {
            Self::Good
        } else if normalized >= 0.25 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Range table + color strategy. Every mapping goes through one model so the two stay consistent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricModel {
    pub profile: RangeProfile,
    pub colors: ColorScheme,
}

impl MetricModel {
    pub const fn new(profile: RangeProfile, colors: ColorScheme) -> Self {
        Self { profile, colors }
    }

    pub fn range_of(&self, metric: MetricType) -> &'static MetricRange {
        &self.profile.table()[metric.index()]
    }

    /// Linear position of `value` inside the metric range, clamped to `[0, 1]`.
    pub fn normalize(&self, value: f32, metric: MetricType) -> f32 {
        let range = self.range_of(metric);
        let normalized = (value - range.min) / range.span();
        if normalized.is_nan() {
            return 0.0;
        }
        normalized.clamp(0.0, 1.0)
    }

    /// Inverse of `normalize` for values inside the range.
    pub fn denormalize(&self, normalized: f32, metric: MetricType) -> f32 {
        let range = self.range_of(metric);
        range.min + normalized.clamp(0.0, 1.0) * range.span()
    }

    pub fn color_for(&self, value: f32, metric: MetricType) -> [f32; 3] {
        self.color_at(self.normalize(value, metric))
    }

    /// color for an already normalized value
    pub fn color_at(&self, t: f32) -> [f32; 3] {
        let t = t.clamp(0.0, 1.0);
        match self.colors {
            ColorScheme::RgbLerp => lerp_rgb(POOR_COLOR, GOOD_COLOR, t),
            ColorScheme::HueSweep => hsl_to_rgb(t * HUE_GOOD_DEGREES, HUE_SATURATION, HUE_LIGHTNESS),
        }
    }

    pub fn poor_color(&self) -> [f32; 3] {
        self.color_at(0.0)
    }

    pub fn good_color(&self) -> [f32; 3] {
        self.color_at(1.0)
    }

    /// Quality bucket of the clamped normalized value.
    pub fn quality_level(&self, value: f32, metric: MetricType) -> QualityLevel {
        QualityLevel::from_normalized(self.normalize(value, metric))
    }

    /// One height-correlated value for `metric`.
    ///
    /// Quality trends upward with `height_factor` (0 = ground, 1 = roof) with bounded noise on
    /// top. Consumes exactly two draws from `rng`.
    pub fn synthesize<R: RandomSource + ?Sized>(&self, metric: MetricType, height_factor: f32, rng: &mut R) -> f32 {
        let range = self.range_of(metric);

        // ground: 20-50% of the range, roof: 70-100%
        let base_quality = 0.2 + height_factor * 0.5 + rng.unit() * 0.3;
        let variation = (rng.unit() - 0.5) * 0.2;
        let quality = (base_quality + variation).clamp(0.0, 1.0);

        round_metric(metric, range.min + quality * range.span())
    }
}

pub fn round_metric(metric: MetricType, value: f32) -> f32 {
    if metric.is_integral() {
        value.round()
    } else {
        (value * 10.0).round() / 10.0
    }
}

fn lerp_rgb(from: [f32; 3], to: [f32; 3], t: f32) -> [f32; 3] {
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
    ]
}

/// hue in degrees, saturation and lightness in [0, 1]
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    [r + m, g + m, b + m]
}

/// `#rrggbb`, channels clamped to [0, 1]
pub fn to_hex([r, g, b]: [f32; 3]) -> String {
    let channel = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}
