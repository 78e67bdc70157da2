use std::collections::{BTreeSet, HashMap};

use crate::core::ShapeHandle;
use crate::math::{Rect, Vector2};

/// Shapes spanning more cells than this are kept in an overflow list
/// instead of being hashed.
const MAX_CELLS_PER_ENTRY: i64 = 4096;

/// Spatial hashing broad-phase over planar bounds.
///
/// Entries are inserted and removed one at a time so the index can be
/// refreshed per shape after a teleport.
#[derive(Debug)]
pub struct SpatialHashing {
    /// The cell size (both dimensions)
    cell_size: f32,

    /// Map from cell coordinates to the shapes overlapping that cell
    cells: HashMap<(i32, i32), Vec<ShapeHandle>>,

    /// Bounds each entry was indexed with
    entries: HashMap<ShapeHandle, Rect>,

    /// Entries too large to hash
    oversized: BTreeSet<ShapeHandle>,
}

impl SpatialHashing {
    /// Creates a new spatial hashing broad-phase
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cell_size,
            cells: HashMap::new(),
            entries: HashMap::new(),
            oversized: BTreeSet::new(),
        }
    }

    /// Gets the cell index for a position
    fn get_cell_index(&self, position: Vector2) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    /// Gets the range of cell indices for a rectangle
    fn get_cell_range(&self, rect: &Rect) -> ((i32, i32), (i32, i32)) {
        (self.get_cell_index(rect.min), self.get_cell_index(rect.max))
    }

    fn cell_count(min: (i32, i32), max: (i32, i32)) -> i64 {
        (max.0 as i64 - min.0 as i64 + 1) * (max.1 as i64 - min.1 as i64 + 1)
    }

    /// Indexes a shape under the given bounds, replacing any previous entry
    pub fn insert(&mut self, handle: ShapeHandle, bounds: Rect) {
        self.remove(handle);

        let (min_cell, max_cell) = self.get_cell_range(&bounds);
        if Self::cell_count(min_cell, max_cell) > MAX_CELLS_PER_ENTRY {
            self.oversized.insert(handle);
        } else {
            for x in min_cell.0..=max_cell.0 {
                for y in min_cell.1..=max_cell.1 {
                    self.cells.entry((x, y)).or_default().push(handle);
                }
            }
        }
        self.entries.insert(handle, bounds);
    }

    /// Drops a shape from the index. Returns false if it was not indexed.
    pub fn remove(&mut self, handle: ShapeHandle) -> bool {
        let Some(bounds) = self.entries.remove(&handle) else {
            return false;
        };
        if self.oversized.remove(&handle) {
            return true;
        }

        let (min_cell, max_cell) = self.get_cell_range(&bounds);
        for x in min_cell.0..=max_cell.0 {
            for y in min_cell.1..=max_cell.1 {
                if let Some(cell) = self.cells.get_mut(&(x, y)) {
                    cell.retain(|h| *h != handle);
                    if cell.is_empty() {
                        self.cells.remove(&(x, y));
                    }
                }
            }
        }
        true
    }

    /// Returns true if the shape is indexed
    pub fn contains(&self, handle: ShapeHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Returns the bounds a shape was indexed with
    pub fn get_bounds(&self, handle: ShapeHandle) -> Option<Rect> {
        self.entries.get(&handle).copied()
    }

    /// Number of indexed shapes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.cells.clear();
        self.entries.clear();
        self.oversized.clear();
    }

    /// Shapes whose indexed bounds overlap `rect`, in handle order
    pub fn query(&self, rect: &Rect) -> Vec<ShapeHandle> {
        let mut found = BTreeSet::new();

        let (min_cell, max_cell) = self.get_cell_range(rect);
        if Self::cell_count(min_cell, max_cell) > MAX_CELLS_PER_ENTRY {
            found.extend(self.entries.keys().copied());
        } else {
            for x in min_cell.0..=max_cell.0 {
                for y in min_cell.1..=max_cell.1 {
                    if let Some(cell) = self.cells.get(&(x, y)) {
                        found.extend(cell.iter().copied());
                    }
                }
            }
            found.extend(self.oversized.iter().copied());
        }

        found
            .into_iter()
            .filter(|handle| {
                self.entries
                    .get(handle)
                    .map_or(false, |bounds| bounds.intersects(rect))
            })
            .collect()
    }
}
