//! Configuration for a center-selection pass.
//!
//! [`ChooseCenterParams`] is an immutable value built once per invocation
//! through a validating builder. The two weight triples each sum to 1.0:
//! the scoring weights rank search radii within a volume, the
//! reconciliation weights rank individual candidates against the fitted
//! trajectory.

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::choose::model_select::ConfidenceLevel;
use crate::errors::ChooseCenterError;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChooseCenterParams {
    /// Scoring weight for the peak-wind term.
    pub wind_weight: f64,
    /// Scoring weight for the inverse center-spread term.
    pub std_weight: f64,
    /// Scoring weight for the converging-center-count term.
    pub pts_weight: f64,

    /// Reconciliation weight applied to both the X and Y likelihoods.
    pub position_weight: f64,
    /// Reconciliation weight for the RMW likelihood.
    pub rmw_weight: f64,
    /// Reconciliation weight for the tangential-wind likelihood.
    pub vel_weight: f64,

    /// Minimum qualifying volumes inside the window before curve fitting is
    /// attempted; below this the last scored mean is used directly.
    pub min_volumes: usize,

    /// Analysis window (inclusive); volumes outside it never feed a fit.
    pub start_time: Epoch,
    pub end_time: Epoch,

    /// Confidence level for the F-test stopping criterion.
    pub confidence: ConfidenceLevel,
}

impl ChooseCenterParams {
    /// Builder preloaded with the default weights, for the given window.
    pub fn builder(start_time: Epoch, end_time: Epoch) -> ChooseCenterParamsBuilder {
        ChooseCenterParamsBuilder::new(start_time, end_time)
    }
}

/// Builder for [`ChooseCenterParams`], with validation in [`build`].
///
/// [`build`]: ChooseCenterParamsBuilder::build
#[derive(Debug, Clone)]
pub struct ChooseCenterParamsBuilder {
    params: ChooseCenterParams,
}

impl ChooseCenterParamsBuilder {
    pub fn new(start_time: Epoch, end_time: Epoch) -> Self {
        ChooseCenterParamsBuilder {
            params: ChooseCenterParams {
                wind_weight: 0.5,
                std_weight: 0.25,
                pts_weight: 0.25,
                position_weight: 0.4,
                rmw_weight: 0.4,
                vel_weight: 0.2,
                min_volumes: 6,
                start_time,
                end_time,
                confidence: ConfidenceLevel::Percent95,
            },
        }
    }

    /// Set the radius-scoring weights (wind, inverse spread, count).
    pub fn score_weights(mut self, wind: f64, std: f64, pts: f64) -> Self {
        self.params.wind_weight = wind;
        self.params.std_weight = std;
        self.params.pts_weight = pts;
        self
    }

    /// Set the reconciliation weights (position, RMW, wind).
    pub fn reconcile_weights(mut self, position: f64, rmw: f64, vel: f64) -> Self {
        self.params.position_weight = position;
        self.params.rmw_weight = rmw;
        self.params.vel_weight = vel;
        self
    }

    pub fn min_volumes(mut self, v: usize) -> Self {
        self.params.min_volumes = v;
        self
    }

    pub fn confidence(mut self, v: ConfidenceLevel) -> Self {
        self.params.confidence = v;
        self
    }

    /// Validate and produce the final parameter set.
    ///
    /// Rules
    /// -----
    /// * every weight lies in `[0, 1]`,
    /// * `wind + std + pts = 1` and `position + rmw + vel = 1` (within 1e-6),
    /// * `min_volumes >= 1`,
    /// * `start_time <= end_time`.
    pub fn build(self) -> Result<ChooseCenterParams, ChooseCenterError> {
        let p = &self.params;
        let in_unit = |w: f64| (0.0..=1.0).contains(&w);

        for (name, w) in [
            ("wind_weight", p.wind_weight),
            ("std_weight", p.std_weight),
            ("pts_weight", p.pts_weight),
            ("position_weight", p.position_weight),
            ("rmw_weight", p.rmw_weight),
            ("vel_weight", p.vel_weight),
        ] {
            if !in_unit(w) {
                return Err(ChooseCenterError::InvalidParams(format!(
                    "{name} = {w} is outside [0, 1]"
                )));
            }
        }

        let score_sum = p.wind_weight + p.std_weight + p.pts_weight;
        if (score_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ChooseCenterError::InvalidParams(format!(
                "scoring weights sum to {score_sum}, expected 1.0"
            )));
        }

        let rec_sum = p.position_weight + p.rmw_weight + p.vel_weight;
        if (rec_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ChooseCenterError::InvalidParams(format!(
                "reconciliation weights sum to {rec_sum}, expected 1.0"
            )));
        }

        if p.min_volumes == 0 {
            return Err(ChooseCenterError::InvalidParams(
                "min_volumes must be at least 1".into(),
            ));
        }

        if p.start_time > p.end_time {
            return Err(ChooseCenterError::InvalidParams(format!(
                "start_time {} is after end_time {}",
                p.start_time, p.end_time
            )));
        }

        Ok(self.params)
    }
}
