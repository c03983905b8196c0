//! Per-volume track record, the output of a center-selection pass.

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::constants::KM_TO_NAUTICAL_MILES;

/// Final estimate for one analysis level of one volume.
///
/// Fields are `None` when the level could not be resolved (no scored radius,
/// or the aggregate values were absent). `rmw_uncertainty_km` is `None` on
/// the fallback path, which has no fit to measure against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackLevel {
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    pub height_km: Option<f64>,
    pub max_wind: Option<f64>,
    pub rmw_km: Option<f64>,
    pub rmw_uncertainty_km: Option<f64>,
    pub center_std_km: Option<f64>,
    pub converging_centers: Option<usize>,
}

impl TrackLevel {
    /// RMW in nautical miles, the unit forecast products report it in.
    pub fn rmw_nm(&self) -> Option<f64> {
        self.rmw_km.map(|r| r * KM_TO_NAUTICAL_MILES)
    }
}

/// One processed volume's storm estimate across all analysis levels.
///
/// Central pressure is derived from the wind field by a separate retrieval
/// step and is never populated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    time: Epoch,
    levels: Vec<TrackLevel>,
    pub central_pressure_hpa: Option<f64>,
    pub best_level: Option<usize>,
}

impl TrackRecord {
    pub fn new(time: Epoch, num_levels: usize) -> Self {
        TrackRecord {
            time,
            levels: vec![TrackLevel::default(); num_levels],
            central_pressure_hpa: None,
            best_level: None,
        }
    }

    pub fn time(&self) -> Epoch {
        self.time
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, index: usize) -> Option<&TrackLevel> {
        self.levels.get(index)
    }

    pub fn level_mut(&mut self, index: usize) -> Option<&mut TrackLevel> {
        self.levels.get_mut(index)
    }

    pub fn levels(&self) -> &[TrackLevel] {
        &self.levels
    }

    /// Pick the level this record is best summarized by: the resolved level
    /// with the tightest center spread, lowest level on ties. Levels without
    /// a position are never eligible.
    pub fn resolve_best_level(&mut self) {
        self.best_level = self
            .levels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.latitude_deg.is_some() && l.longitude_deg.is_some())
            .min_by(|(_, a), (_, b)| {
                let sa = a.center_std_km.unwrap_or(f64::MAX);
                let sb = b.center_std_km.unwrap_or(f64::MAX);
                sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i);
    }

    /// Mean RMW over the levels that resolved one.
    pub fn average_rmw_km(&self) -> Option<f64> {
        let resolved: Vec<f64> = self.levels.iter().filter_map(|l| l.rmw_km).collect();
        if resolved.is_empty() {
            None
        } else {
            Some(resolved.iter().sum::<f64>() / resolved.len() as f64)
        }
    }
}

#[cfg(test)]
mod track_test {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_defaults_are_absent() {
        let t = Epoch::from_gregorian_utc(2005, 8, 28, 12, 0, 0, 0);
        let record = TrackRecord::new(t, 3);
        assert_eq!(record.num_levels(), 3);
        assert_eq!(record.level(1).unwrap().rmw_km, None);
        assert_eq!(record.average_rmw_km(), None);
        assert_eq!(record.central_pressure_hpa, None);
    }

    #[test]
    fn test_best_level_prefers_tight_spread() {
        let t = Epoch::from_gregorian_utc(2005, 8, 28, 12, 0, 0, 0);
        let mut record = TrackRecord::new(t, 3);
        for (i, std) in [(0, 4.0), (2, 1.5)] {
            let level = record.level_mut(i).unwrap();
            level.latitude_deg = Some(30.0);
            level.longitude_deg = Some(-88.0);
            level.center_std_km = Some(std);
        }
        record.resolve_best_level();
        assert_eq!(record.best_level, Some(2));

        // No resolved positions, no best level.
        let mut empty = TrackRecord::new(t, 2);
        empty.resolve_best_level();
        assert_eq!(empty.best_level, None);
    }

    #[test]
    fn test_rmw_units_and_average() {
        let t = Epoch::from_gregorian_utc(2005, 8, 28, 12, 0, 0, 0);
        let mut record = TrackRecord::new(t, 2);
        record.level_mut(0).unwrap().rmw_km = Some(20.0);
        record.level_mut(1).unwrap().rmw_km = Some(30.0);
        assert_relative_eq!(record.level(0).unwrap().rmw_nm().unwrap(), 10.799136);
        assert_relative_eq!(record.average_rmw_km().unwrap(), 25.0);
    }
}
