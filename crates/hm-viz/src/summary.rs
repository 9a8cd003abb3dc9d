//! Per-level summaries for the three plot styles.
//!
//! Every constructor returns `None` for a level without observations; the
//! renderer leaves such a slot empty.

use hm_core::{Error, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::kind::ErrorBar;

/// Grid resolution of the violin density.
pub const VIOLIN_GRID_SIZE: usize = 100;

/// Whisker reach in units of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Linear-interpolated quantile of an ascending slice (`q` in `[0, 1]`).
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

fn mean_sd(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, f64::NAN);
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

/// Box-and-whisker summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    /// Number of observations.
    pub n: usize,
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Lowest observation within `q1 - 1.5 IQR`.
    pub whisker_lo: f64,
    /// Highest observation within `q3 + 1.5 IQR`.
    pub whisker_hi: f64,
    /// Observations beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Summarize a level.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let s = sorted_copy(values);
        let q1 = quantile(&s, 0.25);
        let median = quantile(&s, 0.5);
        let q3 = quantile(&s, 0.75);
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - WHISKER_IQR * iqr, q3 + WHISKER_IQR * iqr);

        let inside = || s.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
        let whisker_lo = inside().next().unwrap_or(q1);
        let whisker_hi = inside().last().unwrap_or(q3);
        let outliers = s.iter().copied().filter(|v| *v < lo_fence || *v > hi_fence).collect();

        Some(Self { n: s.len(), q1, median, q3, whisker_lo, whisker_hi, outliers })
    }
}

/// Kernel density over the data range of one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Density {
    /// Evaluation points, ascending from the minimum to the maximum observation.
    pub y: Vec<f64>,
    /// Density at each point.
    pub density: Vec<f64>,
    /// Kernel bandwidth.
    pub bandwidth: f64,
}

/// Violin summary: density outline plus quartiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolinStats {
    /// Number of observations.
    pub n: usize,
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Smallest observation.
    pub min: f64,
    /// Largest observation.
    pub max: f64,
    /// `None` when the level has a single distinct value (drawn as a flat line).
    pub kde: Option<Density>,
}

impl ViolinStats {
    /// Gaussian KDE with Scott's bandwidth, evaluated on
    /// [`VIOLIN_GRID_SIZE`] points between the extreme observations.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let s = sorted_copy(values);
        let (min, max) = (s[0], s[s.len() - 1]);
        let (_, sd) = mean_sd(&s);

        let kde = if s.len() >= 2 && sd > 0.0 {
            // Scott's rule: sd * n^(-1/5)
            let bw = sd * (s.len() as f64).powf(-0.2);
            let norm = 1.0 / (s.len() as f64 * bw * (2.0 * std::f64::consts::PI).sqrt());
            let step = (max - min) / (VIOLIN_GRID_SIZE - 1) as f64;
            let y: Vec<f64> = (0..VIOLIN_GRID_SIZE).map(|i| min + step * i as f64).collect();
            let density = y
                .iter()
                .map(|yi| {
                    norm * s.iter().map(|xi| (-0.5 * ((yi - xi) / bw).powi(2)).exp()).sum::<f64>()
                })
                .collect();
            Some(Density { y, density, bandwidth: bw })
        } else {
            None
        };

        Some(Self {
            n: s.len(),
            q1: quantile(&s, 0.25),
            median: quantile(&s, 0.5),
            q3: quantile(&s, 0.75),
            min,
            max,
            kde,
        })
    }

    /// Peak density, 0 for a degenerate level.
    pub fn peak_density(&self) -> f64 {
        self.kde.as_ref().map_or(0.0, |k| k.density.iter().copied().fold(0.0, f64::max))
    }
}

/// Point-plot summary: mean and error-bar interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStats {
    /// Number of observations.
    pub n: usize,
    /// Sample mean.
    pub mean: f64,
    /// Lower end of the error bar (equals `mean` for a single observation).
    pub lo: f64,
    /// Upper end of the error bar (equals `mean` for a single observation).
    pub hi: f64,
}

impl PointStats {
    /// Mean with a Student-t confidence interval or a scaled standard error.
    pub fn from_values(values: &[f64], error: ErrorBar) -> Result<Option<Self>> {
        if values.is_empty() {
            return Ok(None);
        }
        let n = values.len();
        let (mean, sd) = mean_sd(values);
        if n < 2 {
            return Ok(Some(Self { n, mean, lo: mean, hi: mean }));
        }
        let se = sd / (n as f64).sqrt();
        let half = match error {
            ErrorBar::Se(mult) => mult * se,
            ErrorBar::Ci(level) => {
                let t = StudentsT::new(0.0, 1.0, (n - 1) as f64)
                    .map_err(|e| Error::computation(format!("Student t: {e}")))?;
                let tail = (1.0 - level / 100.0) / 2.0;
                t.inverse_cdf(1.0 - tail) * se
            }
        };
        Ok(Some(Self { n, mean, lo: mean - half, hi: mean + half }))
    }
}
