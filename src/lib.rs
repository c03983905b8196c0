//! # vortrack
//!
//! Vortex center selection and track fitting for single-Doppler radar
//! analysis of tropical cyclones.
//!
//! An upstream simplex search proposes, for every radar volume, candidate
//! vortex centers at several analysis heights and search radii. This crate
//! collapses that candidate history into a single, temporally consistent
//! estimate of the storm center, radius of maximum wind (RMW), and peak
//! tangential wind per height:
//!
//! 1. **Scoring** – per volume and height, the search radius whose aggregate
//!    statistics best combine wind magnitude, center spread, and
//!    converging-center count is selected ([`choose::scorer`]).
//! 2. **Curve fitting** – per quantized height, four time series (center X,
//!    center Y, RMW, peak wind) are fit with incrementally higher-degree
//!    polynomials, stopping when an F-test no longer justifies the extra
//!    degree ([`choose::model_select`]).
//! 3. **Reconciliation** – every individual candidate center is re-scored
//!    against the fitted trajectory with a weighted Gaussian likelihood, and
//!    the best physical candidate becomes the final per-height selection
//!    ([`choose::reconcile`]).
//!
//! When the accumulated history is too short to fit, the most recent
//! volume's scored aggregates are used directly (the *last mean* fallback).
//!
//! The crate owns no I/O: candidate histories are built by the caller and
//! the resulting [`TrackRecord`] is handed back, one per invocation.
//!
//! ```rust,no_run
//! use vortrack::{ChooseCenter, ChooseCenterParams, CandidateHistory, RadarSite};
//! use hifitime::Epoch;
//!
//! # fn run(history: CandidateHistory) -> Result<(), vortrack::ChooseCenterError> {
//! let params = ChooseCenterParams::builder(
//!     Epoch::from_gregorian_utc(2005, 8, 28, 0, 0, 0, 0),
//!     Epoch::from_gregorian_utc(2005, 8, 29, 0, 0, 0, 0),
//! )
//! .min_volumes(6)
//! .build()?;
//!
//! let site = RadarSite::new(30.5, -88.3);
//! let outcome = ChooseCenter::new(&history, &params, site).find_center()?;
//! for diag in &outcome.diagnostics {
//!     eprintln!("{diag}");
//! }
//! # Ok(()) }
//! ```

pub mod candidates;
pub mod choose;
pub mod constants;
pub mod errors;
pub mod projection;
pub mod track;

pub use candidates::{CandidateHistory, CenterCandidate, VolumeCandidates};
pub use choose::model_select::ConfidenceLevel;
pub use choose::params::{ChooseCenterParams, ChooseCenterParamsBuilder};
pub use choose::{ChooseCenter, ChooseCenterOutcome};
pub use errors::{ChooseCenterError, Diagnostic, Severity};
pub use projection::RadarSite;
pub use track::{TrackLevel, TrackRecord};
