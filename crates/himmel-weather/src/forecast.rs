//! Forecast shaping: condense raw feed series into renderable samples.
//!
//! Pure functions over [`HourlySeries`] and [`DailySeries`]; all
//! acquisition concerns stay in the clients.

use chrono::NaiveDateTime;

use crate::types::{DailySample, DailySeries, HourlySample, HourlySeries};

/// Pick evenly spaced hourly samples starting from the current hour.
///
/// The first sample is the last series entry at or before `now`, so the
/// running hour is included; after that, every `step_hours`-th entry up
/// to `count` samples. Returns an empty vector when the series is empty
/// or `now` lies beyond its end.
pub fn sample_hourly(
    series: &HourlySeries,
    now: NaiveDateTime,
    step_hours: usize,
    count: usize,
) -> Vec<HourlySample> {
    let start = match series.time.iter().position(|t| *t >= now) {
        Some(0) => 0,
        Some(i) => i - 1,
        None => return Vec::new(),
    };
    let step = step_hours.max(1);

    let mut samples = Vec::with_capacity(count);
    for i in 0..count {
        let idx = start + i * step;
        if idx >= series.len() {
            break;
        }
        samples.push(HourlySample {
            time: series.time[idx],
            temperature: series.temperature_2m[idx],
            code: series.weathercode[idx],
        });
    }
    samples
}

/// Reduce the daily series to the rows after `offset`, at most `count`.
///
/// The dashboard passes `offset` 1: index 0 is today, already shown as
/// current conditions. A short series truncates silently.
pub fn summarize_daily(series: &DailySeries, offset: usize, count: usize) -> Vec<DailySample> {
    let mut days = Vec::with_capacity(count);
    for idx in offset..offset.saturating_add(count) {
        if idx >= series.len() {
            break;
        }
        days.push(DailySample {
            date: series.time[idx],
            temp_max: series.temperature_2m_max[idx],
            temp_min: series.temperature_2m_min[idx],
            code: series.weathercode[idx],
        });
    }
    days
}

/// Inclusive bounds of a temperature sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempRange {
    pub min: f64,
    pub max: f64,
}

impl TempRange {
    /// Width of the range, with 1.0 substituted when all values are
    /// equal so positions stay finite.
    pub fn span(&self) -> f64 {
        let width = self.max - self.min;
        if width == 0.0 {
            1.0
        } else {
            width
        }
    }

    /// Where `value` falls inside the range, clamped to `[0, 1]`.
    pub fn position(&self, value: f64) -> f64 {
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }
}

/// Bounds of `values`, or `None` when empty.
pub fn normalize_range(values: &[f64]) -> Option<TempRange> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(TempRange { min, max })
}
