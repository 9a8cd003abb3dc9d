/// Mantissas tried for tick spacing, per decade.
const STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// One axis: data limits, tick marks and title.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
}

impl Axis {
    /// Value axis over exactly `[min, max]`, with at most `max_ticks` round
    /// ticks inside it. A zero-width range is widened by one unit each way.
    pub fn linear(min: f64, max: f64, max_ticks: usize) -> Self {
        let (min, max) = if max - min > 1e-15 { (min, max) } else { (min - 1.0, max + 1.0) };
        let step = tick_step(min, max, max_ticks);
        let (first, last) = tick_range(min, max, step);
        let decimals = decimals_for(step);
        let tick_positions: Vec<f64> = (first..=last).map(|k| k as f64 * step).collect();
        let tick_labels = tick_positions.iter().map(|&v| tick_label(v, step, decimals)).collect();
        Self { min, max, label: String::new(), tick_positions, tick_labels }
    }

    /// Category axis: slot `i` is centred on `i`, limits padded by half a slot.
    pub fn categorical<S: AsRef<str>>(labels: &[S]) -> Self {
        Self {
            min: -0.5,
            max: labels.len() as f64 - 0.5,
            label: String::new(),
            tick_positions: (0..labels.len()).map(|i| i as f64).collect(),
            tick_labels: labels.iter().map(|s| s.as_ref().to_owned()).collect(),
        }
    }

    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self { label: label.into(), ..self }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` on a pixel range; `px_max` may be below `px_min`.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        px_min + (value - self.min) / self.span() * (px_max - px_min)
    }

    /// Pixel length of `delta` data units on an axis `px_len` long.
    pub fn scale(&self, delta: f64, px_len: f64) -> f64 {
        delta / self.span() * px_len
    }
}

/// First and last multiple of `step` inside `[min, max]`.
fn tick_range(min: f64, max: f64, step: f64) -> (i64, i64) {
    ((min / step - 1e-9).ceil() as i64, (max / step + 1e-9).floor() as i64)
}

/// Smallest 1-2-2.5-5 spacing that puts at most `max_ticks` ticks in range.
fn tick_step(min: f64, max: f64, max_ticks: usize) -> f64 {
    let max_ticks = max_ticks.max(2);
    let decade = 10f64.powf(((max - min) / max_ticks as f64).log10().floor());
    STEPS
        .iter()
        .map(|m| m * decade)
        .find(|&step| {
            let (first, last) = tick_range(min, max, step);
            last - first + 1 <= max_ticks as i64
        })
        .unwrap_or(10.0 * decade)
}

/// Digits after the point needed to print multiples of `step` exactly.
fn decimals_for(step: f64) -> usize {
    (0..6).find(|&d| {
        let scaled = step * 10f64.powi(d as i32);
        (scaled - scaled.round()).abs() < 1e-6 * scaled.max(1.0)
    })
    .unwrap_or(6)
}

fn tick_label(value: f64, step: f64, decimals: usize) -> String {
    // snap float noise around zero so it never prints as "-0"
    let value = if value.abs() < step * 1e-6 { 0.0 } else { value };
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_ticks_stay_inside_limits() {
        let ax = Axis::linear(-0.3, 10.4, 6);
        assert_eq!((ax.min, ax.max), (-0.3, 10.4));
        assert_eq!(ax.tick_labels, vec!["0", "2", "4", "6", "8", "10"]);
        assert!(ax.tick_positions.iter().all(|&t| t >= ax.min && t <= ax.max));
    }

    #[test]
    fn fractional_ticks_have_no_negative_zero() {
        let ax = Axis::linear(-0.25, 0.25, 6);
        assert_eq!(ax.tick_labels, vec!["-0.2", "-0.1", "0.0", "0.1", "0.2"]);
    }

    #[test]
    fn quarter_steps_print_two_decimals() {
        let ax = Axis::linear(0.0, 1.0, 5);
        assert_eq!(ax.tick_labels, vec!["0.00", "0.25", "0.50", "0.75", "1.00"]);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let ax = Axis::linear(5.0, 5.0, 6);
        assert_eq!((ax.min, ax.max), (4.0, 6.0));
        assert_eq!(ax.tick_labels, vec!["4.0", "4.5", "5.0", "5.5", "6.0"]);
    }

    #[test]
    fn tick_count_respects_limit() {
        for (lo, hi) in [(0.0, 1.0), (-3.7, 112.0), (1e-3, 4e-3), (250.0, 2750.0)] {
            for n in 2..10 {
                let ax = Axis::linear(lo, hi, n);
                assert!(ax.tick_positions.len() <= n, "{lo}..{hi} n={n}");
                assert!(!ax.tick_positions.is_empty(), "{lo}..{hi} n={n}");
            }
        }
    }

    #[test]
    fn categorical_slots() {
        let ax = Axis::categorical(&["ctrl", "low", "high"]);
        assert_eq!(ax.tick_positions, vec![0.0, 1.0, 2.0]);
        assert!((ax.data_to_pixel(1.0, 0.0, 300.0) - 150.0).abs() < 1e-9);
        assert!((ax.scale(1.0, 300.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn inverted_pixel_range() {
        let ax = Axis::linear(0.0, 100.0, 5);
        assert!((ax.data_to_pixel(25.0, 400.0, 0.0) - 300.0).abs() < 1e-9);
    }
}
