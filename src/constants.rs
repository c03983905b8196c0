//! Numeric constants shared across the center-selection pipeline.

/// Highest polynomial degree the model selector will ever try, regardless of
/// how many volumes are available.
pub const MAX_POLY_DEGREE: usize = 20;

/// Minimum number of qualifying volumes a height bucket needs before a curve
/// is fit at that height. Buckets with fewer observations are dropped.
pub const MIN_BUCKET_VOLUMES: usize = 4;

/// Degrees-of-freedom cap for the critical-F lookup tables.
pub const MAX_FTEST_DOF: usize = 30;

/// Residual variances at or below this level are treated as exact fits: the
/// remaining residual is floating-point noise, not signal, and must not feed
/// the F-test ratio.
pub const EXACT_FIT_VARIANCE: f64 = 1e-12;

/// Quantization steps per kilometer when bucketing analysis heights.
pub const HEIGHT_QUANTA_PER_KM: f64 = 1000.0;

/// Kilometers to nautical miles.
pub const KM_TO_NAUTICAL_MILES: f64 = 0.5399568;
