//! Candidate scoring: pick the best search radius per volume and height.
//!
//! For every analysis level of every volume, each search radius carries an
//! aggregate mean wind, center spread, and converging-center count. The
//! scorer keeps only radii at or next to a local wind maximum, then ranks
//! the survivors with a weighted composite of the three statistics. The
//! winning radius becomes that volume/level's working center estimate and
//! feeds both the curve fitter and the fallback path.

use itertools::izip;

use crate::candidates::{CandidateHistory, Grid2};
use crate::choose::params::ChooseCenterParams;
use crate::errors::ChooseCenterError;

/// Cross-level mean of the selected centers for one volume, with spread
/// diagnostics. Not consumed by the pipeline; surfaced for display layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct VolumeMeanCenter {
    pub x_km: f64,
    pub y_km: f64,
    pub radius_km: f64,
    /// Standard deviation of the selected radius across levels.
    pub radius_dev_km: f64,
    /// Root-mean-square distance of the per-level centers from their mean.
    pub center_dev_km: f64,
}

/// Scorer output over the whole history.
#[derive(Debug, Clone)]
pub(crate) struct VolumeScores {
    /// Per volume, per level: index of the winning radius.
    pub best_radius: Vec<Vec<Option<usize>>>,
    /// Per volume: composite score per `(level, radius)`.
    pub scores: Vec<Grid2<f64>>,
    /// Per volume: cross-level mean center diagnostics.
    pub mean_center: Vec<Option<VolumeMeanCenter>>,
}

/// Score every volume and level of the history.
///
/// Fails with a data-quality error when any composite score evaluates to
/// NaN or infinity; partial results are never returned.
pub(crate) fn score_volumes(
    history: &CandidateHistory,
    params: &ChooseCenterParams,
) -> Result<VolumeScores, ChooseCenterError> {
    let mut best_radius = Vec::with_capacity(history.len());
    let mut scores = Vec::with_capacity(history.len());
    let mut mean_center = Vec::with_capacity(history.len());

    for (vidx, volume) in history.iter().enumerate() {
        let num_levels = volume.num_levels();
        let num_radii = volume.num_radii();
        let mut volume_best = vec![None; num_levels];
        let mut volume_scores = Grid2::new(num_levels, num_radii);
        let mut selected: Vec<(f64, f64, f64)> = Vec::new();

        let pt_ratio = volume.num_points_used() as f64 / std::f64::consts::E;

        for level in 0..num_levels {
            let winds: Vec<Option<f64>> =
                (0..num_radii).map(|r| volume.mean_wind(level, r)).collect();
            let stds: Vec<Option<f64>> =
                (0..num_radii).map(|r| volume.center_std(level, r)).collect();
            let pts: Vec<Option<f64>> = (0..num_radii)
                .map(|r| volume.converging_centers(level, r).map(|c| c as f64))
                .collect();

            let mut best_wind: f64 = 0.0;
            let mut best_std: f64 = 50.0;
            let mut best_pts: f64 = 0.0;
            for (w, s, p) in izip!(&winds, &stds, &pts) {
                if let Some(w) = w {
                    if *w > best_wind {
                        best_wind = *w;
                    }
                }
                if let Some(s) = s {
                    if *s < best_std {
                        best_std = *s;
                    }
                }
                if let Some(p) = p {
                    if *p > best_pts {
                        best_pts = *p;
                    }
                }
            }

            // Interior radii that are local wind maxima. An absent neighbor
            // never blocks a peak.
            let mut is_peak = vec![false; num_radii];
            let mut peak_values = Vec::new();
            for r in 1..num_radii.saturating_sub(1) {
                if let Some(w) = winds[r] {
                    let left = winds[r - 1].unwrap_or(f64::NEG_INFINITY);
                    let right = winds[r + 1].unwrap_or(f64::NEG_INFINITY);
                    if w >= left && w >= right {
                        is_peak[r] = true;
                        peak_values.push(w);
                    }
                }
            }
            if !peak_values.is_empty() {
                let mean = peak_values.iter().sum::<f64>() / peak_values.len() as f64;
                let var = peak_values
                    .iter()
                    .map(|v| (v - mean) * (v - mean))
                    .sum::<f64>()
                    / peak_values.len() as f64;
                tracing::trace!(volume = vidx, level, peak_mean = mean, peak_var = var);
            }

            // Suppress everything that is neither a peak nor adjacent to
            // one; the survivors keep their raw wind values.
            let masked: Vec<Option<f64>> = (0..num_radii)
                .map(|r| {
                    let interior = r > 0 && r + 1 < num_radii;
                    let near_peak =
                        is_peak[r] || (r > 0 && is_peak[r - 1]) || (r + 1 < num_radii && is_peak[r + 1]);
                    if interior && near_peak {
                        winds[r]
                    } else {
                        None
                    }
                })
                .collect();
            for w in masked.iter().flatten() {
                if *w > best_wind {
                    best_wind = *w;
                }
            }

            // Arg-max over every surviving radius. Composite scores can be
            // legitimately negative (the count term is a log ratio), so the
            // running best starts below any computable score.
            let mut best_score = f64::NEG_INFINITY;
            let mut best_r: Option<usize> = None;
            for r in 0..num_radii {
                let Some(wind) = masked[r] else {
                    continue;
                };
                let mut score = 0.0;
                if best_wind != 0.0 {
                    score += params.wind_weight * (wind - best_wind).exp();
                }
                if let Some(std) = stds[r] {
                    if std != 0.0 {
                        score += params.std_weight * best_std / std;
                    }
                }
                if let Some(p) = pts[r] {
                    if best_pts != 0.0 && p != 0.0 && pt_ratio != 0.0 {
                        score += params.pts_weight * (p / pt_ratio).ln();
                    }
                }
                if !score.is_finite() {
                    return Err(ChooseCenterError::NonFiniteScore {
                        volume: vidx,
                        level,
                        radius: r,
                    });
                }
                volume_scores.set(level, r, score);
                if score > best_score {
                    best_score = score;
                    best_r = Some(r);
                }
            }

            volume_best[level] = best_r;
            if let Some(r) = best_r {
                if let (Some(x), Some(y), Some(rad)) = (
                    volume.mean_x(level, r),
                    volume.mean_y(level, r),
                    volume.radius_km(r),
                ) {
                    selected.push((x, y, rad));
                }
            }
        }

        mean_center.push(summarize_selection(&selected));
        best_radius.push(volume_best);
        scores.push(volume_scores);
    }

    Ok(VolumeScores {
        best_radius,
        scores,
        mean_center,
    })
}

fn summarize_selection(selected: &[(f64, f64, f64)]) -> Option<VolumeMeanCenter> {
    if selected.is_empty() {
        return None;
    }
    let n = selected.len() as f64;
    let x = selected.iter().map(|s| s.0).sum::<f64>() / n;
    let y = selected.iter().map(|s| s.1).sum::<f64>() / n;
    let radius = selected.iter().map(|s| s.2).sum::<f64>() / n;
    let radius_dev = (selected
        .iter()
        .map(|s| (s.2 - radius) * (s.2 - radius))
        .sum::<f64>()
        / n)
        .sqrt();
    let center_dev = (selected
        .iter()
        .map(|s| (s.0 - x) * (s.0 - x) + (s.1 - y) * (s.1 - y))
        .sum::<f64>()
        / n)
        .sqrt();
    Some(VolumeMeanCenter {
        x_km: x,
        y_km: y,
        radius_km: radius,
        radius_dev_km: radius_dev,
        center_dev_km: center_dev,
    })
}
