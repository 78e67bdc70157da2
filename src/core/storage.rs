use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::error::PhysicsError;
use crate::Result;

/// An opaque identifier handed out by a [`Storage`]
pub trait Handle: Copy + Ord + Debug {
    /// Builds a handle from its raw id
    fn from_raw(id: u32) -> Self;

    /// Returns the raw id of the handle
    fn raw(self) -> u32;

    /// Human readable kind, used in error messages
    fn kind() -> &'static str;
}

/// Handle-keyed storage for physics objects.
///
/// Ids start at 1 and are never reused within one storage, so a stale
/// handle can never alias a newer object. Iteration follows handle order,
/// which keeps stepping deterministic.
#[derive(Debug)]
pub struct Storage<H: Handle, T> {
    items: BTreeMap<H, T>,
    next_id: u32,
}

impl<H: Handle, T> Default for Storage<H, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Handle, T> Storage<H, T> {
    /// Creates a new empty storage
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1, // Start at 1, so 0 can represent invalid handle
        }
    }

    /// Adds an item to the storage and returns its handle
    pub fn add(&mut self, item: T) -> H {
        let handle = H::from_raw(self.next_id);
        self.next_id += 1;
        self.items.insert(handle, item);
        handle
    }

    /// Gets a reference to an item by its handle
    pub fn get(&self, handle: H) -> Result<&T> {
        self.items.get(&handle).ok_or_else(|| not_found(handle))
    }

    /// Gets a mutable reference to an item by its handle
    pub fn get_mut(&mut self, handle: H) -> Result<&mut T> {
        self.items.get_mut(&handle).ok_or_else(|| not_found(handle))
    }

    /// Removes an item from the storage
    pub fn remove(&mut self, handle: H) -> Result<T> {
        self.items.remove(&handle).ok_or_else(|| not_found(handle))
    }

    /// Checks whether a handle refers to a live item
    pub fn contains(&self, handle: H) -> bool {
        self.items.contains_key(&handle)
    }

    /// Returns the number of items in the storage
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns all live handles, in order
    pub fn handles(&self) -> Vec<H> {
        self.items.keys().copied().collect()
    }

    /// Returns an iterator over all items
    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> + '_ {
        self.items.iter().map(|(h, item)| (*h, item))
    }

    /// Returns a mutable iterator over all items
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (H, &mut T)> + '_ {
        self.items.iter_mut().map(|(h, item)| (*h, item))
    }
}

fn not_found<H: Handle>(handle: H) -> PhysicsError {
    PhysicsError::ResourceNotFound(format!("{} with handle {:?} not found", H::kind(), handle))
}
