#![allow(dead_code)]

use hifitime::{Epoch, Unit};
use vortrack::{CandidateHistory, CenterCandidate, VolumeCandidates};

pub const HEIGHTS_KM: [f64; 3] = [1.0, 2.0, 3.0];
pub const RADII_KM: [f64; 5] = [10.0, 20.0, 30.0, 40.0, 50.0];
pub const WIND_PEAK: f64 = 35.0;
pub const RMW_KM: f64 = 30.0;

/// Perturbation applied to the aggregate centers and winds. On eight
/// equally spaced scan times this vector is orthogonal to every polynomial
/// of degree at most three, so a linear fit of the perturbed series
/// recovers the unperturbed trajectory exactly and the degree search stops
/// at one.
pub const NOISE: [f64; 8] = [0.05, -0.25, 0.55, -0.75, 0.75, -0.55, 0.25, -0.05];

/// Storm center in radar-relative km after `minutes` of drift.
pub fn true_center(minutes: f64) -> (f64, f64) {
    (5.0 + 0.1 * minutes, -3.0 - 0.05 * minutes)
}

/// Aggregate (perturbed) center the simplex search would report for the
/// volume at `index`.
pub fn observed_center(index: usize, step_min: f64) -> (f64, f64) {
    let (x, y) = true_center(step_min * index as f64);
    (x + NOISE[index % 8], y - NOISE[index % 8])
}

/// Aggregate peak wind for the volume at `index`.
pub fn observed_wind(index: usize) -> f64 {
    WIND_PEAK + 0.5 * NOISE[index % 8]
}

/// A synthetic drifting-storm history of `n` volumes, `step_min` minutes
/// apart, starting at `t0`.
///
/// Every level of every volume carries aggregates at all five radii with a
/// wind profile peaking at 30 km, plus two planted candidates: an
/// on-trajectory center at the 30 km radius and an off-track decoy at the
/// 10 km radius.
pub fn storm_history(n: usize, step_min: f64, t0: Epoch) -> CandidateHistory {
    let mut history = CandidateHistory::new();
    let wind_profile = [10.0, 20.0, WIND_PEAK, 20.0, 10.0];

    for i in 0..n {
        let minutes = step_min * i as f64;
        let t = t0 + minutes * Unit::Minute;
        let mut volume =
            VolumeCandidates::new(t, HEIGHTS_KM.to_vec(), RADII_KM.to_vec(), 2, 25);

        let (x_true, y_true) = true_center(minutes);
        let (x_obs, y_obs) = observed_center(i, step_min);

        for level in 0..HEIGHTS_KM.len() {
            for (r, base_wind) in wind_profile.iter().enumerate() {
                volume.set_mean_center(level, r, x_obs, y_obs);
                volume.set_mean_wind(level, r, base_wind + 0.5 * NOISE[i % 8]);
                volume.set_center_std(level, r, 5.0);
                volume.set_wind_std(level, r, 2.0);
                volume.set_converging_centers(level, r, 20);
            }
            volume.set_center(
                level,
                2,
                0,
                CenterCandidate::new(x_true, y_true, RMW_KM, WIND_PEAK),
            );
            volume.set_center(
                level,
                0,
                0,
                CenterCandidate::new(x_true + 8.0, y_true + 8.0, 10.0, 10.0),
            );
        }

        history.push(volume);
    }

    history
}
