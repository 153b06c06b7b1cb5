//! Summaries over generated RF points: per metric, overall, per floor and per height band.

use super::metrics::{MetricModel, MetricType, QualityLevel};
use super::{Building, Metrics, RfPoint};

/// Average / min / max of one metric over a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub metric: MetricType,
    pub average: f32,
    pub min: f32,
    pub max: f32,
    pub quality: QualityLevel,
}

impl MetricSummary {
    /// `None` for an empty point set.
    pub fn from_points<'a>(
        model: &MetricModel,
        points: impl IntoIterator<Item = &'a RfPoint>,
        metric: MetricType,
    ) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0f32;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;

        for value in points.into_iter().map(|p| p.metrics.get(metric)) {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return None;
        }

        let average = sum / count as f32;
        Some(Self {
            metric,
            average,
            min,
            max,
            quality: model.quality_level(average, metric),
        })
    }
}

/// Mean of the clamped normalized per-metric averages, with its quality bucket.
pub fn overall_average(model: &MetricModel, points: &[RfPoint]) -> Option<(f32, QualityLevel)> {
    let mut total = 0.0;
    for metric in MetricType::ALL {
        let summary = MetricSummary::from_points(model, points, metric)?;
        total += model.normalize(summary.average, metric);
    }

    let normalized = total / MetricType::ALL.len() as f32;
    Some((normalized, QualityLevel::from_normalized(normalized)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorAverage {
    /// zero based
    pub floor: u32,
    pub point_count: usize,
    /// `None` when no point falls on the floor
    pub metrics: Option<Metrics>,
}

/// Averages the building's own points storey by storey.
///
/// A point belongs to floor `f` when its height lies in `[bottom + f*fh, bottom + (f+1)*fh)`.
pub fn floor_averages(building: &Building, points: &[RfPoint]) -> Vec<FloorAverage> {
    let floor_height = building.floor_height();
    let bottom = building.bottom();

    (0..building.floor_count)
        .map(|floor| {
            let low = bottom + floor_height * floor as f32;
            let high = low + floor_height;

            let on_floor: Vec<&RfPoint> = points
                .iter()
                .filter(|p| p.building_id == building.id)
                .filter(|p| p.position[1] >= low && p.position[1] < high)
                .collect();

            FloorAverage {
                floor,
                point_count: on_floor.len(),
                metrics: average_metrics(&on_floor),
            }
        })
        .collect()
}

pub fn average_metrics(points: &[&RfPoint]) -> Option<Metrics> {
    if points.is_empty() {
        return None;
    }
    let count = points.len() as f32;
    Some(Metrics::from_fn(|metric| {
        points.iter().map(|p| p.metrics.get(metric)).sum::<f32>() / count
    }))
}

/// Mean clamped normalized value of `metric` in `bins` equal vertical slices of the building.
pub fn height_profile(
    model: &MetricModel,
    building: &Building,
    points: &[RfPoint],
    metric: MetricType,
    bins: usize,
) -> Vec<Option<f32>> {
    let mut sums = vec![0.0f32; bins];
    let mut counts = vec![0usize; bins];
    let bottom = building.bottom();

    for point in points.iter().filter(|p| p.building_id == building.id) {
        let relative = (point.position[1] - bottom) / building.height;
        let bin = (relative * bins as f32).floor();
        if bin < 0.0 || bin >= bins as f32 {
            continue;
        }
        sums[bin as usize] += model.normalize(point.metrics.get(metric), metric);
        counts[bin as usize] += 1;
    }

    sums.into_iter()
        .zip(counts)
        .map(|(sum, count)| (count > 0).then(|| sum / count as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{point_at, sample_tower};
    use approx::assert_relative_eq;

    #[test]
    fn summary_of_known_values() {
        let model = MetricModel::default();
        let points = vec![
            point_at("highrise-0", 1.0, Metrics { rssi: -80.0, ..Metrics::default() }),
            point_at("highrise-0", 2.0, Metrics { rssi: -60.0, ..Metrics::default() }),
        ];

        let summary = MetricSummary::from_points(&model, &points, MetricType::Rssi).unwrap();
        assert_relative_eq!(summary.average, -70.0);
        assert_relative_eq!(summary.min, -80.0);
        assert_relative_eq!(summary.max, -60.0);
        // (-70 + 85) / 35 = 0.43
        assert_eq!(summary.quality, QualityLevel::Fair);

        assert!(MetricSummary::from_points(&model, std::iter::empty(), MetricType::Rssi).is_none());
    }

    #[test]
    fn overall_average_of_best_values_is_excellent() {
        let model = MetricModel::default();
        let best = Metrics::from_fn(|metric| model.range_of(metric).max);
        let points = vec![point_at("highrise-0", 1.0, best)];

        let (normalized, quality) = overall_average(&model, &points).unwrap();
        assert_relative_eq!(normalized, 1.0);
        assert_eq!(quality, QualityLevel::Excellent);
        assert!(overall_average(&model, &[]).is_none());
    }

    #[test]
    fn floors_bucket_by_height() {
        // 120m tower -> 40 floors of 3m
        let tower = sample_tower();
        let points = vec![
            point_at(&tower.id, 0.0, Metrics { snr: 10.0, ..Metrics::default() }),
            point_at(&tower.id, 2.9, Metrics { snr: 20.0, ..Metrics::default() }),
            point_at(&tower.id, 3.0, Metrics { snr: 5.0, ..Metrics::default() }),
            point_at("lowrise-1", 1.0, Metrics { snr: 0.0, ..Metrics::default() }),
        ];

        let floors = floor_averages(&tower, &points);
        assert_eq!(floors.len(), 40);
        assert_eq!(floors[0].point_count, 2);
        assert_relative_eq!(floors[0].metrics.unwrap().snr, 15.0);
        assert_eq!(floors[1].point_count, 1);
        assert!(floors[2].metrics.is_none());
    }

    #[test]
    fn height_profile_skips_empty_bins() {
        let model = MetricModel::default();
        let tower = sample_tower();
        let points = vec![
            point_at(&tower.id, 1.0, Metrics { snr: 0.0, ..Metrics::default() }),
            point_at(&tower.id, 119.0, Metrics { snr: 20.0, ..Metrics::default() }),
            point_at(&tower.id, 500.0, Metrics { snr: 20.0, ..Metrics::default() }),
        ];

        let profile = height_profile(&model, &tower, &points, MetricType::Snr, 4);
        assert_eq!(profile, vec![Some(0.0), None, None, Some(1.0)]);
    }
}
