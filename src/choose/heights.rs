//! Height bucket indexing.
//!
//! Analysis heights vary slightly from volume to volume, so volumes are
//! grouped by quantized height before any time series is assembled. A
//! bucket records how many volumes inside the analysis window observed that
//! height, and for each volume index which local level index holds it.
//! Buckets with three or fewer observations are dropped: a meaningful
//! low-order fit with F-test headroom needs at least four points.

use std::collections::BTreeMap;

use hifitime::Epoch;

use crate::candidates::CandidateHistory;
use crate::constants::{HEIGHT_QUANTA_PER_KM, MIN_BUCKET_VOLUMES};

/// One quantized height's qualifying volumes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HeightBucket {
    /// Number of in-window volumes observing this height.
    pub count: usize,
    /// Per volume index, the local level index of this height, or `None`
    /// when the volume is outside the window or lacks the height.
    pub level_at_volume: Vec<Option<usize>>,
}

/// Quantized height key to bucket, sorted by height.
#[derive(Debug, Default)]
pub(crate) struct HeightBuckets {
    buckets: BTreeMap<i64, HeightBucket>,
}

impl HeightBuckets {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets in ascending height order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &HeightBucket)> {
        self.buckets.iter().map(|(k, b)| (*k, b))
    }
}

pub(crate) fn quantize_height(height_km: f64) -> i64 {
    (height_km * HEIGHT_QUANTA_PER_KM).round() as i64
}

/// Build the bucket index over volumes whose timestamp lies in
/// `[start, end]`, then prune buckets too sparse to fit.
pub(crate) fn index_heights(
    history: &CandidateHistory,
    start: Epoch,
    end: Epoch,
) -> HeightBuckets {
    let mut buckets: BTreeMap<i64, HeightBucket> = BTreeMap::new();
    let n = history.len();

    for (vidx, volume) in history.iter().enumerate() {
        if volume.time() < start || volume.time() > end {
            continue;
        }
        for level in 0..volume.num_levels() {
            let Some(height) = volume.height_km(level) else {
                continue;
            };
            let bucket = buckets
                .entry(quantize_height(height))
                .or_insert_with(|| HeightBucket {
                    count: 0,
                    level_at_volume: vec![None; n],
                });
            // Two levels of one volume can quantize to the same key; the
            // bucket counts distinct volumes, not level occurrences.
            if bucket.level_at_volume[vidx].is_none() {
                bucket.count += 1;
            }
            bucket.level_at_volume[vidx] = Some(level);
        }
    }

    buckets.retain(|key, bucket| {
        let keep = bucket.count >= MIN_BUCKET_VOLUMES;
        if !keep {
            tracing::debug!(
                height = *key,
                volumes = bucket.count,
                "dropping height bucket with too few volumes"
            );
        }
        keep
    });

    HeightBuckets { buckets }
}
