//! Candidate data model.
//!
//! The upstream simplex search produces, per radar volume, aggregate
//! statistics and individual candidate centers indexed by analysis level and
//! search radius. This module holds the read-only containers for that data:
//!
//! * [`CenterCandidate`] – a single converged center estimate,
//! * [`VolumeCandidates`] – one volume's full candidate set,
//! * [`CandidateHistory`] – the time-ordered sequence of volumes.
//!
//! Absent values are `None` slots in the grids; there is no fill sentinel.

mod center;
mod grid;
mod history;
mod volume;

pub use center::CenterCandidate;
pub use grid::{Grid2, Grid3};
pub use history::CandidateHistory;
pub use volume::VolumeCandidates;
