//! Center selection pipeline.
//!
//! [`ChooseCenter`] wires the stages together: score every volume, index
//! comparable heights, fit the four trajectory polynomials per height, and
//! reconcile individual candidates against the fits. Whenever the history
//! is too sparse for a trustworthy fit, or the fit itself degenerates, the
//! pass degrades to the latest volume's scored aggregates instead of
//! failing the storm analysis.

pub(crate) mod heights;
pub mod model_select;
pub mod params;
pub(crate) mod poly;
pub(crate) mod reconcile;
pub(crate) mod scorer;

use crate::candidates::CandidateHistory;
use crate::errors::{ChooseCenterError, Diagnostic};
use crate::projection::RadarSite;
use crate::track::TrackRecord;

use self::params::ChooseCenterParams;
use self::scorer::VolumeScores;

/// Result of one center-selection pass.
#[derive(Debug)]
pub struct ChooseCenterOutcome {
    /// Track record for the most recent volume.
    pub record: TrackRecord,
    /// Messages for the caller's logging layer, in emission order.
    pub diagnostics: Vec<Diagnostic>,
    /// True when the record came from the last-mean fallback rather than a
    /// reconciled fit.
    pub used_fallback: bool,
}

/// One-shot selector over a candidate history.
///
/// Borrowed inputs only; all working state lives inside
/// [`find_center`](ChooseCenter::find_center) and is dropped on return.
pub struct ChooseCenter<'a> {
    history: &'a CandidateHistory,
    params: &'a ChooseCenterParams,
    site: RadarSite,
}

impl<'a> ChooseCenter<'a> {
    pub fn new(
        history: &'a CandidateHistory,
        params: &'a ChooseCenterParams,
        site: RadarSite,
    ) -> Self {
        ChooseCenter {
            history,
            params,
            site,
        }
    }

    /// Produce the track record for the most recent volume.
    ///
    /// Errors
    /// ------
    /// Only data-quality problems are fatal: an empty history, or a
    /// non-finite composite score. Sparse histories and degenerate fits
    /// fall back to the latest scored aggregates and are reported through
    /// the outcome's diagnostics.
    pub fn find_center(&self) -> Result<ChooseCenterOutcome, ChooseCenterError> {
        if self.history.is_empty() {
            return Err(ChooseCenterError::EmptyHistory);
        }

        let scores = scorer::score_volumes(self.history, self.params)?;
        let latest_index = self
            .history
            .latest_index()
            .expect("non-empty history has a latest volume");

        let mut diagnostics = Vec::new();

        let latest_time = self
            .history
            .get(latest_index)
            .expect("latest index in range")
            .time();
        if latest_time < self.params.start_time || latest_time > self.params.end_time {
            let diag = Diagnostic::warning(format!(
                "latest volume at {latest_time} is outside the analysis window; using last scored mean"
            ));
            tracing::warn!("{}", diag.message);
            diagnostics.push(diag);
            return Ok(self.last_mean_outcome(&scores, latest_index, diagnostics));
        }

        let qualifying = self
            .history
            .iter()
            .filter(|v| v.time() >= self.params.start_time && v.time() <= self.params.end_time)
            .count();
        if qualifying < self.params.min_volumes {
            let diag = Diagnostic::warning(format!(
                "{qualifying} qualifying volumes, need {} for curve fitting; using last scored mean",
                self.params.min_volumes
            ));
            tracing::warn!("{}", diag.message);
            diagnostics.push(diag);
            return Ok(self.last_mean_outcome(&scores, latest_index, diagnostics));
        }

        let buckets =
            heights::index_heights(self.history, self.params.start_time, self.params.end_time);
        if buckets.is_empty() {
            let diag = Diagnostic::warning(
                "no height observed often enough to fit; using last scored mean",
            );
            tracing::warn!("{}", diag.message);
            diagnostics.push(diag);
            return Ok(self.last_mean_outcome(&scores, latest_index, diagnostics));
        }

        let bucket_fits =
            match model_select::fit_buckets(self.history, &scores, &buckets, self.params.confidence)
            {
                Ok(fits) if !fits.is_empty() => fits,
                Ok(_) => {
                    let diag = Diagnostic::warning(
                        "every height bucket was too sparse to fit; using last scored mean",
                    );
                    tracing::warn!("{}", diag.message);
                    diagnostics.push(diag);
                    return Ok(self.last_mean_outcome(&scores, latest_index, diagnostics));
                }
                Err(err) => {
                    let diag =
                        Diagnostic::warning(format!("{err}; using last scored mean instead"));
                    tracing::warn!("{}", diag.message);
                    diagnostics.push(diag);
                    return Ok(self.last_mean_outcome(&scores, latest_index, diagnostics));
                }
            };

        let reconciled =
            reconcile::reconcile(self.history, &bucket_fits, self.params, self.site, latest_index);
        diagnostics.push(Diagnostic::info(format!(
            "reconciled {} height bucket(s) against fitted trajectories",
            reconciled.bucket_sq_errors.len()
        )));

        Ok(ChooseCenterOutcome {
            record: reconciled.record,
            diagnostics,
            used_fallback: false,
        })
    }

    fn last_mean_outcome(
        &self,
        scores: &VolumeScores,
        latest_index: usize,
        diagnostics: Vec<Diagnostic>,
    ) -> ChooseCenterOutcome {
        ChooseCenterOutcome {
            record: self.use_last_mean(scores, latest_index),
            diagnostics,
            used_fallback: true,
        }
    }

    /// Fallback: the latest volume's scored aggregates become the record.
    ///
    /// Levels without a scored radius, or whose aggregate center is absent,
    /// stay absent. There is no fit, so RMW uncertainty stays absent too.
    /// This path cannot fail.
    fn use_last_mean(&self, scores: &VolumeScores, latest_index: usize) -> TrackRecord {
        let latest = self
            .history
            .get(latest_index)
            .expect("latest index in range");
        let mut record = TrackRecord::new(latest.time(), latest.num_levels());

        for level in 0..latest.num_levels() {
            let Some(radius) = scores.best_radius[latest_index][level] else {
                continue;
            };
            let (Some(x), Some(y)) = (latest.mean_x(level, radius), latest.mean_y(level, radius))
            else {
                continue;
            };
            let (lat, lon) = self.site.offset_to_lat_lon(x, y);
            if let Some(entry) = record.level_mut(level) {
                entry.latitude_deg = Some(lat);
                entry.longitude_deg = Some(lon);
                entry.height_km = latest.height_km(level);
                entry.max_wind = latest.mean_wind(level, radius);
                entry.rmw_km = latest.radius_km(radius);
                entry.rmw_uncertainty_km = None;
                entry.center_std_km = latest.center_std(level, radius);
                entry.converging_centers = latest.converging_centers(level, radius);
            }
        }

        record.resolve_best_level();
        record
    }
}
