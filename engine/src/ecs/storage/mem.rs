//! Low-level memory management for component columns.
//!
//! This module provides [`IndexedMemory`], a raw allocation that manages a contiguous block of
//! `T`-sized elements addressed by index. It does not track which elements are initialized; that is
//! the job of the owning [`Column`](super::column::Column).
//!
//! # Purpose
//!
//! [`IndexedMemory`] handles the lowest level of the storage hierarchy, providing:
//! - Raw allocation, relocation and deallocation
//! - Index-based pointer arithmetic
//! - Configurable growth strategies
//! - A bounds test for pointers ([`contains_ptr`](IndexedMemory::contains_ptr)) used to detect a
//!   source value that lives inside the block about to be relocated
//!
//! # Relocation
//!
//! Growth never resizes in place. A new block is allocated, every element slot of the old block is
//! moved bitwise into it, and only then is the old block released:
//!
//! ```text
//!  old: [ a | b | _ | d ]            (capacity 4, `_` uninitialized)
//!          │   │       │
//!          ▼   ▼       ▼
//!  new: [ a | b | _ | d | _ | _ ]    (capacity 6)
//!  old block deallocated
//! ```
//!
//! Any pointer or reference into the old block is dangling after a relocation. Callers that hold a
//! pointer into the block across a growth must test it with `contains_ptr` first and take a copy of
//! the value before growing.
//!
//! # Growth Strategies
//!
//! [`GrowthStrategy`] controls how memory expands when capacity is exceeded:
//!
//! - **[`GrowthStrategy::Multiply(n)`]**: Exponential growth (e.g., 2x), fewer reallocations, potential waste
//! - **[`GrowthStrategy::Ratio(n, d)`]**: Fractional growth (e.g., 3/2), the column default
//! - **[`GrowthStrategy::Buffer(n)`]**: Linear growth (e.g., +64)
//! - **[`GrowthStrategy::Exact`]**: Minimal growth, space-efficient, frequent reallocations
//!
//! # Zero-Sized Types
//!
//! Zero-sized types never allocate. Capacity is still tracked so index bounds behave the same, and
//! [`contains_ptr`](IndexedMemory::contains_ptr) always reports `false` since there is nothing to
//! invalidate.

use std::{
    alloc::{self, Layout},
    cmp,
    marker::PhantomData,
    ptr::{self, NonNull},
};

/// An enumeration of possible growth factors used when growing the memory's capacity. These options
/// are attempting to allow some trade offs for growing the memory allocation without having to
/// copy the data on every single element added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthStrategy {
    /// Grow in multiples of the current capacity. This is most often used with a factor of 2 where
    /// you get exponential growth to reduce allocations for frequent requests of small growth.
    /// This has the possibility to use more space. So consider use-case to determine which
    /// optimization is best.
    Multiply(usize),
    /// Grow by a fraction of the current capacity, `current * numerator / denominator` rounded up.
    /// `Ratio(3, 2)` is the 1.5x growth used by component columns.
    Ratio(usize, usize),
    /// Grow the current capacity by allocating an additional fixed capacity buffer. This is
    /// less aggressive than the multiply option, but also attempts to reduce allocations for similar
    /// use-cases without as high of a risk of over allocations.
    Buffer(usize),
    /// Grow the current capacity by the exact amount requested. This is the most space efficient,
    /// but will cause significantly more allocations for use-cases with frequent growth requests.
    Exact,
}

impl GrowthStrategy {
    /// Calculate the new capacity to grow to based on the current capacity and the requested
    /// capacity.
    pub fn new_capacity(&self, current: usize, requested: usize) -> usize {
        match *self {
            Self::Multiply(factor) => cmp::max(current.saturating_mul(factor), requested),
            Self::Ratio(numerator, denominator) => {
                debug_assert!(denominator > 0, "growth ratio with a zero denominator");
                let grown = current
                    .saturating_mul(numerator)
                    .div_ceil(cmp::max(denominator, 1));
                cmp::max(grown, requested)
            }
            Self::Buffer(buffer) => cmp::max(current.saturating_add(buffer), requested),
            Self::Exact => requested,
        }
    }
}

impl Default for GrowthStrategy {
    fn default() -> Self {
        Self::Ratio(3, 2)
    }
}

/// A contiguous block of memory holding up to `capacity` values of `T`, indexed by position.
///
/// # Safety
///
/// This structure does **not** track initialization state or handle drop. The caller is responsible for:
/// - Only reading from initialized memory
/// - Manually dropping any values before they are overwritten or the memory is deallocated
/// - Ensuring indices are within bounds when using `ptr_at` and `ptr_at_mut`
/// - Not holding pointers into the block across [`reserve_for`](Self::reserve_for)
pub struct IndexedMemory<T> {
    /// The pointer to the underlying memory.
    ptr: NonNull<T>,
    /// The number of elements the block can hold.
    capacity: usize,
    /// Growth strategy for this memory.
    growth: GrowthStrategy,
    /// The block logically owns values of `T`.
    _marker: PhantomData<T>,
}

impl<T> IndexedMemory<T> {
    const IS_ZST: bool = size_of::<T>() == 0;

    /// Construct a new empty memory block with a growth strategy.
    #[inline]
    pub const fn new(growth: GrowthStrategy) -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            growth,
            _marker: PhantomData,
        }
    }

    /// Construct a memory block with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize, growth: GrowthStrategy) -> Self {
        let mut block = Self::new(growth);
        if capacity > 0 {
            block.relocate(capacity);
        }
        block
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get a pointer to the element at the given index.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `index >= capacity()`.
    #[inline]
    pub fn ptr_at(&self, index: usize) -> *const T {
        debug_assert!(
            index < self.capacity,
            "index {} out of bounds (capacity: {})",
            index,
            self.capacity
        );
        self.ptr.as_ptr().wrapping_add(index)
    }

    /// Get a mutable pointer to the element at the given index.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `index >= capacity()`.
    #[inline]
    pub fn ptr_at_mut(&mut self, index: usize) -> *mut T {
        debug_assert!(
            index < self.capacity,
            "index {} out of bounds (capacity: {})",
            index,
            self.capacity
        );
        self.ptr.as_ptr().wrapping_add(index)
    }

    /// Does `ptr` point into this block? Always `false` for zero-sized types and empty blocks.
    #[inline]
    pub fn contains_ptr(&self, ptr: *const T) -> bool {
        if Self::IS_ZST || self.capacity == 0 {
            return false;
        }
        let start = self.ptr.as_ptr() as *const T as usize;
        let end = start + self.capacity * size_of::<T>();
        (start..end).contains(&(ptr as usize))
    }

    /// Would making `index` addressable relocate the block?
    #[inline]
    pub fn needs_growth_for(&self, index: usize) -> bool {
        index >= self.capacity
    }

    /// Make `index` addressable, growing with the block's strategy. Returns the previous capacity
    /// when the block was relocated.
    pub fn reserve_for(&mut self, index: usize) -> Option<usize> {
        if !self.needs_growth_for(index) {
            return None;
        }
        let previous = self.capacity;
        let requested = index
            .checked_add(1)
            .unwrap_or_else(|| capacity_overflow());
        let capacity = self.growth.new_capacity(previous, requested);
        self.relocate(capacity);
        Some(previous)
    }

    /// Allocate a block of `capacity` elements, move every element slot into it and release the
    /// previous block.
    fn relocate(&mut self, capacity: usize) {
        debug_assert!(capacity > self.capacity);
        if Self::IS_ZST {
            self.capacity = capacity;
            return;
        }

        let new_layout = Layout::array::<T>(capacity).unwrap_or_else(|_| capacity_overflow());
        // SAFETY: `capacity > 0` and `T` is not zero-sized, so the layout has a non-zero size.
        let raw = unsafe { alloc::alloc(new_layout) } as *mut T;
        let Some(new_ptr) = NonNull::new(raw) else {
            alloc::handle_alloc_error(new_layout);
        };

        if self.capacity > 0 {
            // SAFETY: Both blocks hold at least `self.capacity` elements and are distinct
            // allocations. Uninitialized slots are copied as raw bytes and stay uninitialized.
            unsafe {
                ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.capacity);
                self.deallocate();
            }
        }

        self.ptr = new_ptr;
        self.capacity = capacity;
    }

    /// Release the current block without touching its elements.
    ///
    /// # Safety
    ///
    /// The block must be allocated and no longer referenced.
    unsafe fn deallocate(&mut self) {
        if let Ok(layout) = Layout::array::<T>(self.capacity) {
            unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout) };
        }
    }
}

impl<T> Drop for IndexedMemory<T> {
    fn drop(&mut self) {
        // Only deallocate if we actually allocated memory
        if !Self::IS_ZST && self.capacity > 0 {
            // SAFETY: The block is allocated and is being dropped.
            unsafe { self.deallocate() };
        }
    }
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}
