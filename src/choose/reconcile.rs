//! Candidate reconciliation against the fitted trajectory.
//!
//! The scorer worked from per-radius aggregates; once the four trajectory
//! polynomials exist, every *individual* candidate center can be re-judged
//! against them. Each candidate gets a weighted sum of four Gaussian
//! likelihoods (position X/Y, RMW, peak wind) with σ taken from the fit's
//! residual variance, and the best-agreeing candidate supersedes the
//! aggregate pick. The most recent volume's winners populate the track
//! record.

use crate::candidates::{CandidateHistory, CenterCandidate};
use crate::choose::model_select::BucketFit;
use crate::choose::params::ChooseCenterParams;
use crate::constants::EXACT_FIT_VARIANCE;
use crate::projection::RadarSite;
use crate::track::TrackRecord;
use hifitime::Unit;

/// Reconciliation output: the track record for the latest volume plus the
/// per-bucket accumulated squared fit-vs-selected errors (x, y, RMW, wind),
/// retained as informational variance estimates.
#[derive(Debug)]
pub(crate) struct ReconcileOutput {
    pub record: TrackRecord,
    pub bucket_sq_errors: Vec<(i64, [f64; 4])>,
}

/// Gaussian likelihood of `observed` under the fit prediction with the
/// given residual variance. A collapsed σ (exact fit) carries no
/// information and scores the term as a full match.
fn likelihood(predicted: f64, observed: f64, variance: f64) -> f64 {
    if variance <= EXACT_FIT_VARIANCE {
        1.0
    } else {
        let z = (predicted - observed) / variance.sqrt();
        (-0.5 * z * z).exp()
    }
}

/// Re-select the best physical candidate for every qualifying volume of
/// every fitted height bucket, and build the latest volume's track record.
pub(crate) fn reconcile(
    history: &CandidateHistory,
    bucket_fits: &[BucketFit],
    params: &ChooseCenterParams,
    site: RadarSite,
    latest_index: usize,
) -> ReconcileOutput {
    let latest = history.get(latest_index).expect("latest index in range");
    let mut record = TrackRecord::new(latest.time(), latest.num_levels());
    let mut bucket_sq_errors = Vec::with_capacity(bucket_fits.len());

    for bucket in bucket_fits {
        // Heights the latest volume does not observe contribute nothing to
        // this invocation's record.
        if bucket.level_at_volume[latest_index].is_none() {
            continue;
        }

        let mut sq_errors = [0.0_f64; 4];

        for (vidx, level) in bucket.level_at_volume.iter().enumerate() {
            let Some(level) = *level else { continue };
            let volume = history.get(vidx).expect("bucket index in range");
            let minutes = (volume.time() - bucket.ref_time).to_unit(Unit::Minute);

            let fit_x = bucket.fits[0].eval(minutes);
            let fit_y = bucket.fits[1].eval(minutes);
            let fit_rad = bucket.fits[2].eval(minutes);
            let fit_wind = bucket.fits[3].eval(minutes);

            let mut best: Option<(CenterCandidate, usize, f64)> = None;
            for radius in 0..volume.num_radii() {
                for slot in 0..volume.max_candidates() {
                    let Some(candidate) = volume.center(level, radius, slot) else {
                        continue;
                    };
                    let total = params.position_weight
                        * likelihood(fit_x, candidate.x_km, bucket.fits[0].variance)
                        + params.position_weight
                            * likelihood(fit_y, candidate.y_km, bucket.fits[1].variance)
                        + params.rmw_weight
                            * likelihood(fit_rad, candidate.radius_km, bucket.fits[2].variance)
                        + params.vel_weight
                            * likelihood(fit_wind, candidate.max_wind, bucket.fits[3].variance);
                    let better = match best {
                        Some((_, _, best_total)) => total > best_total,
                        None => true,
                    };
                    if better {
                        best = Some((candidate, radius, total));
                    }
                }
            }

            let Some((candidate, radius, _)) = best else {
                continue;
            };

            let x_sq = (fit_x - candidate.x_km) * (fit_x - candidate.x_km);
            let y_sq = (fit_y - candidate.y_km) * (fit_y - candidate.y_km);
            let rad_sq = (fit_rad - candidate.radius_km) * (fit_rad - candidate.radius_km);
            let wind_sq = (fit_wind - candidate.max_wind) * (fit_wind - candidate.max_wind);
            sq_errors[0] += x_sq;
            sq_errors[1] += y_sq;
            sq_errors[2] += rad_sq;
            sq_errors[3] += wind_sq;

            if vidx == latest_index {
                let (lat, lon) = site.offset_to_lat_lon(candidate.x_km, candidate.y_km);
                if let Some(entry) = record.level_mut(level) {
                    entry.latitude_deg = Some(lat);
                    entry.longitude_deg = Some(lon);
                    entry.height_km = volume.height_km(level);
                    entry.max_wind = Some(candidate.max_wind);
                    entry.rmw_km = Some(candidate.radius_km);
                    entry.rmw_uncertainty_km = Some(rad_sq);
                    entry.center_std_km = Some((x_sq * x_sq + y_sq * y_sq).sqrt());
                    entry.converging_centers = volume.converging_centers(level, radius);
                }
            }
        }

        bucket_sq_errors.push((bucket.height_key, sq_errors));
    }

    record.resolve_best_level();

    ReconcileOutput {
        record,
        bucket_sq_errors,
    }
}

#[cfg(test)]
mod reconcile_test {
    use approx::assert_relative_eq;
    use hifitime::Epoch;

    use crate::candidates::VolumeCandidates;
    use crate::choose::poly::PolyFit;

    use super::*;

    fn params() -> ChooseCenterParams {
        ChooseCenterParams::builder(
            Epoch::from_gregorian_utc(2005, 8, 28, 0, 0, 0, 0),
            Epoch::from_gregorian_utc(2005, 8, 29, 0, 0, 0, 0),
        )
        .min_volumes(4)
        .build()
        .unwrap()
    }

    fn linear_fit(intercept: f64, slope: f64, variance: f64) -> PolyFit {
        PolyFit {
            degree: 1,
            coeffs: vec![intercept, slope],
            variance,
        }
    }

    #[test]
    fn test_on_trajectory_candidate_beats_decoys() {
        let t0 = Epoch::from_gregorian_utc(2005, 8, 28, 12, 0, 0, 0);
        let mut volume = VolumeCandidates::new(t0, vec![2.0], vec![20.0, 30.0], 3, 10);
        // Slot 0 holds an off-track decoy, slot 1 the on-track candidate.
        volume.set_center(0, 0, 0, CenterCandidate::new(6.0, -1.0, 20.0, 25.0));
        volume.set_center(0, 1, 1, CenterCandidate::new(4.0, -2.0, 30.0, 34.0));
        volume.set_converging_centers(0, 1, 17);
        let mut history = CandidateHistory::new();
        history.push(volume);

        let bucket = BucketFit {
            height_key: 2000,
            ref_time: t0,
            level_at_volume: vec![Some(0)],
            fits: [
                linear_fit(4.0, 0.0, 0.04),
                linear_fit(-2.0, 0.0, 0.04),
                linear_fit(30.0, 0.0, 0.0),
                linear_fit(34.0, 0.0, 0.25),
            ],
        };

        let out = reconcile(&history, &[bucket], &params(), RadarSite::new(30.0, -88.0), 0);
        let level = out.record.level(0).unwrap();
        assert_relative_eq!(level.rmw_km.unwrap(), 30.0);
        assert_relative_eq!(level.max_wind.unwrap(), 34.0);
        assert_relative_eq!(level.rmw_uncertainty_km.unwrap(), 0.0);
        assert_eq!(level.converging_centers, Some(17));
        let (lat, lon) = RadarSite::new(30.0, -88.0).offset_to_lat_lon(4.0, -2.0);
        assert_relative_eq!(level.latitude_deg.unwrap(), lat);
        assert_relative_eq!(level.longitude_deg.unwrap(), lon);
    }

    #[test]
    fn test_zero_variance_terms_do_not_discriminate() {
        // With every σ collapsed, all candidates score the weight sum and
        // the first stored candidate wins.
        let t0 = Epoch::from_gregorian_utc(2005, 8, 28, 12, 0, 0, 0);
        let mut volume = VolumeCandidates::new(t0, vec![2.0], vec![20.0, 30.0], 2, 10);
        volume.set_center(0, 0, 0, CenterCandidate::new(1.0, 1.0, 20.0, 10.0));
        volume.set_center(0, 1, 0, CenterCandidate::new(2.0, 2.0, 30.0, 20.0));
        let mut history = CandidateHistory::new();
        history.push(volume);

        let bucket = BucketFit {
            height_key: 2000,
            ref_time: t0,
            level_at_volume: vec![Some(0)],
            fits: [
                linear_fit(0.0, 0.0, 0.0),
                linear_fit(0.0, 0.0, 0.0),
                linear_fit(0.0, 0.0, 0.0),
                linear_fit(0.0, 0.0, 0.0),
            ],
        };

        let out = reconcile(&history, &[bucket], &params(), RadarSite::new(30.0, -88.0), 0);
        let level = out.record.level(0).unwrap();
        assert_relative_eq!(level.rmw_km.unwrap(), 20.0);
    }
}
