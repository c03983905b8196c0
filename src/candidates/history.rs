//! Time-ordered candidate history.

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use super::volume::VolumeCandidates;

/// The accumulated per-volume candidate sets for a storm, append-only from
/// the caller's perspective. The pipeline never mutates the history; when
/// time order matters it works through a sorted index instead of reordering
/// the underlying storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateHistory {
    volumes: Vec<VolumeCandidates>,
}

impl CandidateHistory {
    pub fn new() -> Self {
        CandidateHistory::default()
    }

    pub fn push(&mut self, volume: VolumeCandidates) {
        self.volumes.push(volume);
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VolumeCandidates> {
        self.volumes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VolumeCandidates> {
        self.volumes.iter()
    }

    /// Index of the most recently scanned volume (latest timestamp), which
    /// is the volume an invocation produces a track record for.
    pub fn latest_index(&self) -> Option<usize> {
        (0..self.volumes.len()).reduce(|best, i| {
            if self.volumes[i].time() > self.volumes[best].time() {
                i
            } else {
                best
            }
        })
    }

    pub fn latest(&self) -> Option<&VolumeCandidates> {
        self.latest_index().map(|i| &self.volumes[i])
    }

    /// Earliest timestamp in the history.
    pub fn first_time(&self) -> Option<Epoch> {
        self.volumes.iter().map(|v| v.time()).min()
    }

    /// Volume indices sorted by scan time, oldest first. Callers that need
    /// chronological traversal use this instead of sorting the storage.
    pub fn time_sorted_indices(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.volumes.len()).collect();
        idx.sort_by(|&a, &b| self.volumes[a].time().cmp(&self.volumes[b].time()));
        idx
    }
}

#[cfg(test)]
mod history_test {
    use super::*;

    fn vol(t: Epoch) -> VolumeCandidates {
        VolumeCandidates::new(t, vec![1.0], vec![10.0], 1, 4)
    }

    #[test]
    fn test_latest_and_sort_ignore_insertion_order() {
        let t0 = Epoch::from_gregorian_utc(2005, 8, 28, 12, 0, 0, 0);
        let t1 = Epoch::from_gregorian_utc(2005, 8, 28, 12, 6, 0, 0);
        let t2 = Epoch::from_gregorian_utc(2005, 8, 28, 12, 12, 0, 0);

        let mut history = CandidateHistory::new();
        history.push(vol(t1));
        history.push(vol(t2));
        history.push(vol(t0));

        assert_eq!(history.latest_index(), Some(1));
        assert_eq!(history.first_time(), Some(t0));
        assert_eq!(history.time_sorted_indices(), vec![2, 0, 1]);
    }

    #[test]
    fn test_empty_history() {
        let history = CandidateHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.latest_index(), None);
        assert_eq!(history.first_time(), None);
    }
}
