// Trend statistics over a window of raw samples: min/max/avg and two spreads around the average.

use crate::models::TrendStatistics;

/// Summarises `values`. None when the window holds no samples.
pub fn summarize(values: &[f64]) -> Option<TrendStatistics> {
    if values.is_empty() {
        return None;
    }

    let minimum = values.iter().copied().fold(f64::INFINITY, f64::min);
    let maximum = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average = mean_f64(values);

    let abs_dev: Vec<f64> = values.iter().map(|v| (v - average).abs()).collect();
    let sq_dev: Vec<f64> = values.iter().map(|v| (v - average).powi(2)).collect();

    Some(TrendStatistics {
        minimum,
        maximum,
        average,
        mean_deviation: mean_f64(&abs_dev),
        standard_deviation: mean_f64(&sq_dev).sqrt(),
    })
}

fn mean_f64(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.iter().sum::<f64>() / (v.len() as f64)
}
