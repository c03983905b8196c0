//! Flat strided grids with first-class absence.
//!
//! Every per-level/per-radius quantity in a candidate set may be missing for
//! some cells, so the grids store `Option<T>` in a single contiguous `Vec`
//! with computed strides. Out-of-range indices are a caller bug: they abort
//! in debug builds and are clamped to the nearest valid cell in release
//! builds so a stale index cannot corrupt an analysis.

use serde::{Deserialize, Serialize};

/// Dense `(level, radius)` grid of optional values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid2<T> {
    levels: usize,
    radii: usize,
    cells: Vec<Option<T>>,
}

impl<T: Copy> Grid2<T> {
    pub fn new(levels: usize, radii: usize) -> Self {
        Grid2 {
            levels,
            radii,
            cells: vec![None; levels * radii],
        }
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn radii(&self) -> usize {
        self.radii
    }

    fn index(&self, level: usize, radius: usize) -> usize {
        debug_assert!(
            level < self.levels && radius < self.radii,
            "grid index ({level}, {radius}) outside ({}, {})",
            self.levels,
            self.radii
        );
        let level = level.min(self.levels.saturating_sub(1));
        let radius = radius.min(self.radii.saturating_sub(1));
        level * self.radii + radius
    }

    pub fn get(&self, level: usize, radius: usize) -> Option<T> {
        if self.cells.is_empty() {
            return None;
        }
        self.cells[self.index(level, radius)]
    }

    pub fn set(&mut self, level: usize, radius: usize, value: T) {
        if self.cells.is_empty() {
            return;
        }
        let idx = self.index(level, radius);
        self.cells[idx] = Some(value);
    }

    pub fn clear(&mut self, level: usize, radius: usize) {
        if self.cells.is_empty() {
            return;
        }
        let idx = self.index(level, radius);
        self.cells[idx] = None;
    }
}

/// Dense `(level, radius, slot)` grid of optional values, used for the
/// individual candidate centers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid3<T> {
    levels: usize,
    radii: usize,
    slots: usize,
    cells: Vec<Option<T>>,
}

impl<T: Copy> Grid3<T> {
    pub fn new(levels: usize, radii: usize, slots: usize) -> Self {
        Grid3 {
            levels,
            radii,
            slots,
            cells: vec![None; levels * radii * slots],
        }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    fn index(&self, level: usize, radius: usize, slot: usize) -> usize {
        debug_assert!(
            level < self.levels && radius < self.radii && slot < self.slots,
            "grid index ({level}, {radius}, {slot}) outside ({}, {}, {})",
            self.levels,
            self.radii,
            self.slots
        );
        let level = level.min(self.levels.saturating_sub(1));
        let radius = radius.min(self.radii.saturating_sub(1));
        let slot = slot.min(self.slots.saturating_sub(1));
        (level * self.radii + radius) * self.slots + slot
    }

    pub fn get(&self, level: usize, radius: usize, slot: usize) -> Option<T> {
        if self.cells.is_empty() {
            return None;
        }
        self.cells[self.index(level, radius, slot)]
    }

    pub fn set(&mut self, level: usize, radius: usize, slot: usize, value: T) {
        if self.cells.is_empty() {
            return;
        }
        let idx = self.index(level, radius, slot);
        self.cells[idx] = Some(value);
    }
}
