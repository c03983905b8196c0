//! Incremental-degree model selection with an F-test stopping rule.
//!
//! Each tracked quantity's time series is fit with polynomials of
//! increasing degree. Raising the degree always lowers the raw residual
//! sum, so the selector stops when the *variance* (residual sum per degree
//! of freedom) stops improving, or when an F-test says the improvement is
//! not statistically significant at the configured confidence level.

use hifitime::{Epoch, Unit};
use serde::{Deserialize, Serialize};

use crate::candidates::CandidateHistory;
use crate::choose::heights::HeightBuckets;
use crate::choose::poly::{fit_polynomial, residual_sum, PolyFit};
use crate::choose::scorer::VolumeScores;
use crate::constants::{EXACT_FIT_VARIANCE, MAX_FTEST_DOF, MAX_POLY_DEGREE, MIN_BUCKET_VOLUMES};
use crate::errors::ChooseCenterError;

/// Critical F values at the 95% confidence level, indexed by
/// degrees-of-freedom − 1, truncated at 30.
const F_CRITICAL_95: [f64; MAX_FTEST_DOF] = [
    161.45, 18.513, 10.128, 7.7086, 6.6079, 5.9874, 5.5914, 5.3177, 5.1174, 4.9646, 4.8443,
    4.7472, 4.6672, 4.6001, 4.5431, 4.4940, 4.4513, 4.4139, 4.3808, 4.3513, 4.3248, 4.3009,
    4.2793, 4.2597, 4.2417, 4.2252, 4.2100, 4.1960, 4.1830, 4.1709,
];

/// Critical F values at the 99% confidence level.
const F_CRITICAL_99: [f64; MAX_FTEST_DOF] = [
    4052.2, 98.50, 34.12, 21.20, 16.26, 13.75, 12.25, 11.26, 10.56, 10.04, 9.65, 9.33, 9.07, 8.86,
    8.68, 8.53, 8.40, 8.29, 8.18, 8.10, 8.02, 7.95, 7.88, 7.82, 7.77, 7.72, 7.68, 7.64, 7.60,
    7.56,
];

/// Confidence level for the F-test stopping criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Percent95,
    Percent99,
}

impl ConfidenceLevel {
    /// Critical F value for the given denominator degrees of freedom.
    /// Degrees of freedom beyond the table length use the last entry.
    pub fn critical_f(self, dof: usize) -> f64 {
        let table = match self {
            ConfidenceLevel::Percent95 => &F_CRITICAL_95,
            ConfidenceLevel::Percent99 => &F_CRITICAL_99,
        };
        table[dof.clamp(1, MAX_FTEST_DOF) - 1]
    }
}

/// The quantities a trajectory is fit for, per height bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FitQuantity {
    MeanX,
    MeanY,
    Rmw,
    MaxWind,
}

impl FitQuantity {
    pub const ALL: [FitQuantity; 4] = [
        FitQuantity::MeanX,
        FitQuantity::MeanY,
        FitQuantity::Rmw,
        FitQuantity::MaxWind,
    ];

    pub fn index(self) -> usize {
        match self {
            FitQuantity::MeanX => 0,
            FitQuantity::MeanY => 1,
            FitQuantity::Rmw => 2,
            FitQuantity::MaxWind => 3,
        }
    }
}

/// Accepted fits for all four quantities at one height bucket.
#[derive(Debug, Clone)]
pub(crate) struct BucketFit {
    /// Quantized height key this bucket was fit at.
    pub height_key: i64,
    /// Reference epoch of the elapsed-minutes axis: the earliest qualifying
    /// volume at this height.
    pub ref_time: Epoch,
    /// Per volume index, the local level index of this height.
    pub level_at_volume: Vec<Option<usize>>,
    /// Fits indexed by [`FitQuantity::index`].
    pub fits: [PolyFit; 4],
}

/// Select the best-degree polynomial for one time series.
///
/// Degree 1 is accepted unconditionally (there is no lower order to test
/// against). From degree 2 upward the candidate is rejected, and the
/// previous degree accepted, when its variance grows, when both variances
/// have already reached floating-point noise, or when the F statistic
/// `[Var(n−1)·(df+1) − Var(n)·df] / Var(n)` stays under the critical value.
/// The degree is capped at `min(20, samples − 1)`.
pub(crate) fn select_fit(
    times_min: &[f64],
    values: &[f64],
    confidence: ConfidenceLevel,
) -> Result<PolyFit, ChooseCenterError> {
    let n_data = times_min.len();
    debug_assert!(n_data >= 2, "select_fit needs at least two samples");
    let max_degree = MAX_POLY_DEGREE.min(n_data - 1);

    let variance_at = |coeffs: &[f64], degree: usize| {
        residual_sum(coeffs, times_min, values) / (n_data - degree) as f64
    };

    let coeffs = fit_polynomial(times_min, values, 1)?;
    let mut last = PolyFit {
        degree: 1,
        variance: variance_at(&coeffs, 1),
        coeffs,
    };

    for degree in 2..=max_degree {
        let coeffs = fit_polynomial(times_min, values, degree)?;
        let variance = variance_at(&coeffs, degree);

        if variance > last.variance {
            // More freedom made the fit worse per degree of freedom.
            return Ok(last);
        }
        if variance <= EXACT_FIT_VARIANCE && last.variance <= EXACT_FIT_VARIANCE {
            // The lower degree already reproduces the data exactly.
            return Ok(last);
        }

        let current = PolyFit {
            degree,
            coeffs,
            variance,
        };
        if degree == max_degree {
            return Ok(current);
        }

        let dof = n_data - degree;
        let f_stat = if variance > EXACT_FIT_VARIANCE {
            (last.variance * (dof as f64 + 1.0) - variance * dof as f64) / variance
        } else {
            // Perfect fit gained a degree of exactness: keep climbing until
            // the equal-exactness rule above stops the search.
            f64::INFINITY
        };
        if f_stat < confidence.critical_f(dof) {
            return Ok(last);
        }
        last = current;
    }

    Ok(last)
}

/// Fit all four quantities for every surviving height bucket.
///
/// A bucket whose extracted series ends up shorter than the bucket minimum
/// (a selected radius or aggregate value can still be absent at a
/// qualifying volume) is skipped with a debug note rather than failing the
/// pass. Solver failures propagate: the caller falls back to the last
/// scored mean.
pub(crate) fn fit_buckets(
    history: &CandidateHistory,
    scores: &VolumeScores,
    buckets: &HeightBuckets,
    confidence: ConfidenceLevel,
) -> Result<Vec<BucketFit>, ChooseCenterError> {
    let mut fitted = Vec::with_capacity(buckets.len());

    for (height_key, bucket) in buckets.iter() {
        let Some(ref_time) = bucket
            .level_at_volume
            .iter()
            .enumerate()
            .filter(|(_, lvl)| lvl.is_some())
            .map(|(vidx, _)| history.get(vidx).expect("bucket index in range").time())
            .min()
        else {
            continue;
        };

        let mut fits: Vec<PolyFit> = Vec::with_capacity(4);
        let mut skipped = false;
        for quantity in FitQuantity::ALL {
            let mut times = Vec::new();
            let mut values = Vec::new();
            for (vidx, level) in bucket.level_at_volume.iter().enumerate() {
                let Some(level) = *level else { continue };
                let volume = history.get(vidx).expect("bucket index in range");
                let Some(radius) = scores.best_radius[vidx][level] else {
                    continue;
                };
                let value = match quantity {
                    FitQuantity::MeanX => volume.mean_x(level, radius),
                    FitQuantity::MeanY => volume.mean_y(level, radius),
                    FitQuantity::Rmw => volume.radius_km(radius),
                    FitQuantity::MaxWind => volume.mean_wind(level, radius),
                };
                if let Some(value) = value {
                    times.push((volume.time() - ref_time).to_unit(Unit::Minute));
                    values.push(value);
                }
            }

            if times.len() < MIN_BUCKET_VOLUMES {
                tracing::debug!(
                    height = height_key,
                    quantity = ?quantity,
                    samples = times.len(),
                    "skipping height bucket: series too sparse after selection"
                );
                skipped = true;
                break;
            }

            let fit = select_fit(&times, &values, confidence)?;
            tracing::debug!(
                height = height_key,
                quantity = ?quantity,
                degree = fit.degree,
                variance = fit.variance,
                "accepted polynomial fit"
            );
            fits.push(fit);
        }

        if skipped {
            continue;
        }

        let fits: [PolyFit; 4] = fits.try_into().expect("four quantities fit");
        fitted.push(BucketFit {
            height_key,
            ref_time,
            level_at_volume: bucket.level_at_volume.clone(),
            fits,
        });
    }

    Ok(fitted)
}
