//! Web vitals collected from browser reports.
//!
//! The collector is plain shared state owned by the application; handlers
//! reach it through `AppState`. Each metric keeps a bounded window of its
//! most recent samples.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const MAX_SAMPLES_PER_METRIC: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricName {
    Lcp,
    Fcp,
    Ttfb,
    Inp,
    Fid,
    Cls,
}

impl MetricName {
    pub const ALL: [MetricName; 6] = [
        MetricName::Lcp,
        MetricName::Fcp,
        MetricName::Ttfb,
        MetricName::Inp,
        MetricName::Fid,
        MetricName::Cls,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::Lcp => "LCP",
            MetricName::Fcp => "FCP",
            MetricName::Ttfb => "TTFB",
            MetricName::Inp => "INP",
            MetricName::Fid => "FID",
            MetricName::Cls => "CLS",
        }
    }

    /// `(good, poor)` boundaries. Values `<= good` are good, values `> poor`
    /// are poor.
    pub fn thresholds(&self) -> (f64, f64) {
        match self {
            MetricName::Lcp => (2500.0, 4000.0),
            MetricName::Fcp => (1800.0, 3000.0),
            MetricName::Ttfb => (800.0, 1800.0),
            MetricName::Inp => (200.0, 500.0),
            MetricName::Fid => (100.0, 300.0),
            MetricName::Cls => (0.1, 0.25),
        }
    }

    pub fn rate(&self, value: f64) -> VitalsRating {
        let (good, poor) = self.thresholds();
        if value <= good {
            VitalsRating::Good
        } else if value <= poor {
            VitalsRating::NeedsImprovement
        } else {
            VitalsRating::Poor
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricName::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::BadRequest(format!("Unknown metric: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VitalsRating {
    Good,
    NeedsImprovement,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub name: MetricName,
    pub count: usize,
    pub p75: f64,
    pub rating: VitalsRating,
}

#[derive(Debug, Default)]
pub struct VitalsCollector {
    samples: Mutex<HashMap<MetricName, VecDeque<f64>>>,
}

impl VitalsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: MetricName, value: f64) -> Result<VitalsRating, AppError> {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::BadRequest(format!(
                "Invalid value for {name}: {value}"
            )));
        }

        let mut samples = self
            .samples
            .lock()
            .map_err(|_| AppError::Internal("vitals lock poisoned".into()))?;
        let window = samples.entry(name).or_default();
        if window.len() == MAX_SAMPLES_PER_METRIC {
            window.pop_front();
        }
        window.push_back(value);

        Ok(name.rate(value))
    }

    /// Per-metric sample count and nearest-rank p75, for metrics with data.
    pub fn summary(&self) -> Result<Vec<MetricSummary>, AppError> {
        let samples = self
            .samples
            .lock()
            .map_err(|_| AppError::Internal("vitals lock poisoned".into()))?;

        let mut summary: Vec<MetricSummary> = samples
            .iter()
            .filter_map(|(name, window)| {
                let p75 = percentile(window.iter().copied(), 75)?;
                Some(MetricSummary {
                    name: *name,
                    count: window.len(),
                    p75,
                    rating: name.rate(p75),
                })
            })
            .collect();
        summary.sort_by_key(|s| s.name);

        Ok(summary)
    }
}

/// Nearest-rank percentile.
fn percentile(values: impl Iterator<Item = f64>, pct: usize) -> Option<f64> {
    let mut sorted: Vec<f64> = values.collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let rank = (pct * sorted.len()).div_ceil(100).max(1);
    sorted.get(rank - 1).copied()
}
