use hm_viz::{LevelSeries, PointOverlay};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::Canvas;
use crate::config::OverlayConfig;
use crate::plots::Frame;
use crate::primitives::MarkerStyle;

/// Draw every observation on top of the box/violin bodies.
pub fn draw_overlay(
    canvas: &mut Canvas,
    frame: &Frame,
    series: &[LevelSeries],
    overlay: PointOverlay,
    config: &OverlayConfig,
) {
    if overlay == PointOverlay::None {
        return;
    }
    let slot = frame.slot();
    let marker = MarkerStyle {
        size: config.size,
        color: config.color,
        edge: None,
        opacity: config.alpha,
    };
    let mut rng = StdRng::seed_from_u64(config.seed);

    for (i, s) in series.iter().enumerate() {
        if s.values.is_empty() {
            continue;
        }
        let cx = frame.px(i as f64);
        let ys: Vec<f64> = s.values.iter().map(|&v| frame.py(v)).collect();
        let offsets = match overlay {
            PointOverlay::Strip => strip_offsets(ys.len(), config.jitter * slot / 2.0, &mut rng),
            PointOverlay::Swarm => {
                let (offsets, clamped) =
                    swarm_offsets(&ys, config.size, config.swarm_width * slot / 2.0);
                if clamped > 0 {
                    tracing::warn!(
                        level = %s.level,
                        clamped,
                        total = ys.len(),
                        "swarm too wide for its slot; points overlap at the edges"
                    );
                }
                offsets
            }
            PointOverlay::None => continue,
        };
        for (y, dx) in ys.iter().zip(offsets) {
            canvas.marker(cx + dx, *y, &marker);
        }
    }
}

/// Uniform horizontal jitter in `[-half, half]`.
pub fn strip_offsets(n: usize, half: f64, rng: &mut StdRng) -> Vec<f64> {
    if half <= 0.0 {
        return vec![0.0; n];
    }
    (0..n).map(|_| rng.gen_range(-half..=half)).collect()
}

/// Beeswarm placement in pixel space.
///
/// Points are placed from the bottom up at the smallest horizontal offset
/// that keeps them `diameter` apart from every point already placed.
/// Offsets beyond `max_half` are clamped; the second value counts them.
/// The result is aligned with `ys`.
pub fn swarm_offsets(ys: &[f64], diameter: f64, max_half: f64) -> (Vec<f64>, usize) {
    let mut order: Vec<usize> = (0..ys.len()).collect();
    order.sort_by(|&a, &b| ys[b].total_cmp(&ys[a]));

    let mut offsets = vec![0.0; ys.len()];
    let mut placed: Vec<(f64, f64)> = Vec::with_capacity(ys.len());
    let d2 = diameter * diameter;

    for &i in &order {
        let y = ys[i];
        let neighbours: Vec<(f64, f64)> =
            placed.iter().copied().filter(|&(_, py)| (py - y).abs() < diameter).collect();

        let mut candidates = vec![0.0];
        for &(px, py) in &neighbours {
            let dx = (d2 - (py - y).powi(2)).sqrt();
            candidates.push(px + dx);
            candidates.push(px - dx);
        }
        candidates.sort_by(|a: &f64, b: &f64| a.abs().total_cmp(&b.abs()).then(b.total_cmp(a)));

        let fits = |x: f64| {
            neighbours.iter().all(|&(px, py)| (px - x).powi(2) + (py - y).powi(2) >= d2 - 1e-9)
        };
        let x = candidates.into_iter().find(|&x| fits(x)).unwrap_or(0.0);
        offsets[i] = x;
        placed.push((x, y));
    }

    let mut clamped = 0;
    for o in &mut offsets {
        if o.abs() > max_half {
            *o = o.signum() * max_half;
            clamped += 1;
        }
    }
    (offsets, clamped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_is_reproducible_and_bounded() {
        let a = strip_offsets(50, 10.0, &mut StdRng::seed_from_u64(0));
        let b = strip_offsets(50, 10.0, &mut StdRng::seed_from_u64(0));
        assert_eq!(a, b);
        assert!(a.iter().all(|o| o.abs() <= 10.0));
        assert!(a.iter().any(|o| *o != 0.0));
        assert_eq!(strip_offsets(3, 0.0, &mut StdRng::seed_from_u64(0)), vec![0.0; 3]);
    }

    #[test]
    fn swarm_spreads_ties_symmetrically() {
        let (offsets, clamped) = swarm_offsets(&[100.0, 100.0, 100.0], 4.0, 50.0);
        assert_eq!(clamped, 0);
        let mut sorted = offsets.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(sorted, vec![-4.0, 0.0, 4.0]);
    }

    #[test]
    fn swarm_keeps_distant_points_centred() {
        let (offsets, _) = swarm_offsets(&[10.0, 50.0, 90.0], 4.0, 50.0);
        assert_eq!(offsets, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn swarm_points_do_not_overlap() {
        let ys: Vec<f64> = (0..40).map(|i| 100.0 + (i % 7) as f64 * 0.8).collect();
        let (offsets, clamped) = swarm_offsets(&ys, 3.5, 1000.0);
        assert_eq!(clamped, 0);
        for i in 0..ys.len() {
            for j in (i + 1)..ys.len() {
                let d = ((offsets[i] - offsets[j]).powi(2) + (ys[i] - ys[j]).powi(2)).sqrt();
                assert!(d >= 3.5 - 1e-6, "points {i} and {j} overlap ({d})");
            }
        }
    }

    #[test]
    fn swarm_clamps_to_slot() {
        let ys = vec![100.0; 30];
        let (offsets, clamped) = swarm_offsets(&ys, 4.0, 10.0);
        assert!(clamped > 0);
        assert!(offsets.iter().all(|o| o.abs() <= 10.0));
    }
}
