//! Per-volume candidate set.

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use super::center::CenterCandidate;
use super::grid::{Grid2, Grid3};

/// All simplex-search output for one radar volume: per-`(level, radius)`
/// aggregate statistics, the absolute height and radius grids, and the
/// individual converged candidates.
///
/// Built by the upstream search through the setters below; the
/// center-selection pipeline only reads it. The radius grid is fixed by the
/// search configuration and is expected to be identical across all volumes
/// of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeCandidates {
    time: Epoch,
    num_points_used: usize,
    heights_km: Vec<f64>,
    radii_km: Vec<f64>,
    mean_x: Grid2<f64>,
    mean_y: Grid2<f64>,
    center_std: Grid2<f64>,
    mean_wind: Grid2<f64>,
    wind_std: Grid2<f64>,
    converging: Grid2<usize>,
    centers: Grid3<CenterCandidate>,
}

impl VolumeCandidates {
    /// Create an empty candidate set for a volume scanned at `time`.
    ///
    /// Arguments
    /// ---------
    /// * `heights_km` – absolute analysis heights, one per level index,
    /// * `radii_km` – absolute search radii, one per radius index,
    /// * `max_candidates` – candidate slots per `(level, radius)` cell,
    /// * `num_points_used` – total perturbed starting points the simplex
    ///   search ran per cell (the converging-center denominator).
    pub fn new(
        time: Epoch,
        heights_km: Vec<f64>,
        radii_km: Vec<f64>,
        max_candidates: usize,
        num_points_used: usize,
    ) -> Self {
        let levels = heights_km.len();
        let radii = radii_km.len();
        VolumeCandidates {
            time,
            num_points_used,
            heights_km,
            radii_km,
            mean_x: Grid2::new(levels, radii),
            mean_y: Grid2::new(levels, radii),
            center_std: Grid2::new(levels, radii),
            mean_wind: Grid2::new(levels, radii),
            wind_std: Grid2::new(levels, radii),
            converging: Grid2::new(levels, radii),
            centers: Grid3::new(levels, radii, max_candidates),
        }
    }

    pub fn time(&self) -> Epoch {
        self.time
    }

    pub fn num_levels(&self) -> usize {
        self.heights_km.len()
    }

    pub fn num_radii(&self) -> usize {
        self.radii_km.len()
    }

    pub fn max_candidates(&self) -> usize {
        self.centers.slots()
    }

    pub fn num_points_used(&self) -> usize {
        self.num_points_used
    }

    pub fn height_km(&self, level: usize) -> Option<f64> {
        self.heights_km.get(level).copied()
    }

    pub fn radius_km(&self, radius: usize) -> Option<f64> {
        self.radii_km.get(radius).copied()
    }

    pub fn mean_x(&self, level: usize, radius: usize) -> Option<f64> {
        self.mean_x.get(level, radius)
    }

    pub fn mean_y(&self, level: usize, radius: usize) -> Option<f64> {
        self.mean_y.get(level, radius)
    }

    pub fn center_std(&self, level: usize, radius: usize) -> Option<f64> {
        self.center_std.get(level, radius)
    }

    pub fn mean_wind(&self, level: usize, radius: usize) -> Option<f64> {
        self.mean_wind.get(level, radius)
    }

    pub fn wind_std(&self, level: usize, radius: usize) -> Option<f64> {
        self.wind_std.get(level, radius)
    }

    pub fn converging_centers(&self, level: usize, radius: usize) -> Option<usize> {
        self.converging.get(level, radius)
    }

    pub fn center(&self, level: usize, radius: usize, slot: usize) -> Option<CenterCandidate> {
        self.centers.get(level, radius, slot)
    }

    // --- construction-side setters, used by the upstream search ---

    pub fn set_mean_center(&mut self, level: usize, radius: usize, x_km: f64, y_km: f64) {
        self.mean_x.set(level, radius, x_km);
        self.mean_y.set(level, radius, y_km);
    }

    pub fn set_center_std(&mut self, level: usize, radius: usize, std_km: f64) {
        self.center_std.set(level, radius, std_km);
    }

    pub fn set_mean_wind(&mut self, level: usize, radius: usize, wind: f64) {
        self.mean_wind.set(level, radius, wind);
    }

    pub fn set_wind_std(&mut self, level: usize, radius: usize, std: f64) {
        self.wind_std.set(level, radius, std);
    }

    pub fn set_converging_centers(&mut self, level: usize, radius: usize, count: usize) {
        self.converging.set(level, radius, count);
    }

    pub fn set_center(
        &mut self,
        level: usize,
        radius: usize,
        slot: usize,
        center: CenterCandidate,
    ) {
        self.centers.set(level, radius, slot, center);
    }

    /// True when no cell of the volume carries any aggregate wind value.
    pub fn is_empty(&self) -> bool {
        (0..self.num_levels())
            .all(|l| (0..self.num_radii()).all(|r| self.mean_wind.get(l, r).is_none()))
    }
}
