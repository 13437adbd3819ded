//! Bump arena with scoped temporary sub-allocations.
//!
//! [`Arena`] hands out sequential, aligned, zero-initialised regions from a
//! caller-owned byte buffer. Allocations are addressed through typed
//! [`Region`] handles and resolved back into slices through the arena, so
//! one `&mut Arena` owns every allocation of a conversion run and releases
//! them all at once.
//!
//! [`Arena::temporary`] opens a [`TempScope`]. Everything allocated through
//! the scope is zeroed and discarded when the scope is dropped. A scope
//! mutably borrows its parent, so scopes can only nest in stack order.
//!
//! ```text
//! 0                previous   cursor                 capacity
//! |== live ========|== last ==|------- free ---------|
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};
use std::ops::{Deref, DerefMut, Range};

use bytemuck::Pod;
use thiserror::Error;

/// Alignment used when the caller does not ask for one: twice the pointer
/// width, which also covers the vertex record.
pub const DEFAULT_ALIGNMENT: usize = 2 * size_of::<usize>();

/// Errors that can occur during arena allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// The aligned request does not fit in the remaining capacity.
    #[error(
        "arena exhausted: requested {requested} bytes (align {align}) with {used} of {capacity} bytes in use"
    )]
    OutOfMemory {
        requested: usize,
        align: usize,
        used: usize,
        capacity: usize,
    },
    /// Alignments must be powers of two.
    #[error("alignment {0} is not a power of two")]
    InvalidAlignment(usize),
}

/// Typed handle to `len` elements of `T` inside an [`Arena`].
pub struct Region<T> {
    offset: usize,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Region<T> {
    fn new(offset: usize, len: usize) -> Self {
        Self {
            offset,
            len,
            _marker: PhantomData,
        }
    }

    /// Byte offset from the start of the arena.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.len * size_of::<T>()
    }

    fn byte_range(&self) -> Range<usize> {
        self.offset..self.offset + self.size_bytes()
    }
}

impl<T> Clone for Region<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Region<T> {}

impl<T> PartialEq for Region<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.len == other.len
    }
}

impl<T> Eq for Region<T> {}

impl<T> fmt::Debug for Region<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .finish()
    }
}

/// Linear allocator over a caller-owned buffer.
///
/// Invariant: `previous <= cursor <= capacity`. The arena never frees or
/// resizes the backing buffer; dropping the arena hands it back untouched.
pub struct Arena<'a> {
    data: &'a mut [u8],
    cursor: usize,
    previous: usize,
}

impl<'a> Arena<'a> {
    /// Install a backing buffer. Capacity is the buffer length.
    pub fn new(backing: &'a mut [u8]) -> Self {
        Self {
            data: backing,
            cursor: 0,
            previous: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes consumed so far, including alignment padding.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Offset of the most recent allocation.
    pub fn previous(&self) -> usize {
        self.previous
    }

    pub fn remaining(&self) -> usize {
        self.capacity() - self.cursor
    }

    /// Allocate `size` zeroed bytes at [`DEFAULT_ALIGNMENT`].
    pub fn alloc(&mut self, size: usize) -> Result<Region<u8>, ArenaError> {
        self.alloc_aligned(size, DEFAULT_ALIGNMENT)
    }

    /// Allocate `size` zeroed bytes whose address is a multiple of `align`.
    ///
    /// Fails without side effects when the aligned request does not fit.
    pub fn alloc_aligned(&mut self, size: usize, align: usize) -> Result<Region<u8>, ArenaError> {
        let offset = self.reserve(size, align)?;
        Ok(Region::new(offset, size))
    }

    /// Allocate `len` zeroed elements of `T`.
    pub fn alloc_slice<T: Pod>(&mut self, len: usize) -> Result<Region<T>, ArenaError> {
        let align = DEFAULT_ALIGNMENT.max(align_of::<T>());
        let size = len
            .checked_mul(size_of::<T>())
            .ok_or(ArenaError::OutOfMemory {
                requested: usize::MAX,
                align,
                used: self.cursor,
                capacity: self.capacity(),
            })?;
        let offset = self.reserve(size, align)?;
        Ok(Region::new(offset, len))
    }

    fn reserve(&mut self, size: usize, align: usize) -> Result<usize, ArenaError> {
        if !align.is_power_of_two() {
            return Err(ArenaError::InvalidAlignment(align));
        }
        let exhausted = ArenaError::OutOfMemory {
            requested: size,
            align,
            used: self.cursor,
            capacity: self.capacity(),
        };

        // Align the absolute address so typed views of the region are valid.
        let base = self.data.as_ptr() as usize;
        let offset = align_forward(base + self.cursor, align).ok_or(exhausted)? - base;
        let end = offset.checked_add(size).ok_or(exhausted)?;
        if end > self.capacity() {
            return Err(exhausted);
        }

        self.data[offset..end].fill(0);
        self.previous = offset;
        self.cursor = end;
        Ok(offset)
    }

    /// Resolve a region.
    ///
    /// # Panics
    /// If the region was not allocated from this arena.
    pub fn get<T: Pod>(&self, region: Region<T>) -> &[T] {
        bytemuck::cast_slice(&self.data[region.byte_range()])
    }

    /// Resolve a region mutably.
    ///
    /// # Panics
    /// If the region was not allocated from this arena.
    pub fn get_mut<T: Pod>(&mut self, region: Region<T>) -> &mut [T] {
        bytemuck::cast_slice_mut(&mut self.data[region.byte_range()])
    }

    /// Resolve two disjoint regions at once, the first for reading and the
    /// second for writing.
    ///
    /// # Panics
    /// If the regions overlap or were not allocated from this arena.
    pub fn get_disjoint<A: Pod, B: Pod>(
        &mut self,
        src: Region<A>,
        dst: Region<B>,
    ) -> (&[A], &mut [B]) {
        let (a, b) = (src.byte_range(), dst.byte_range());
        assert!(
            a.end <= b.start || b.end <= a.start,
            "regions {a:?} and {b:?} overlap"
        );

        if a.start < b.start {
            let (lo, hi) = self.data.split_at_mut(b.start);
            let dst_len = b.len();
            (
                bytemuck::cast_slice(&lo[a]),
                bytemuck::cast_slice_mut(&mut hi[..dst_len]),
            )
        } else {
            let (lo, hi) = self.data.split_at_mut(a.start);
            let src_len = a.len();
            (
                bytemuck::cast_slice(&hi[..src_len]),
                bytemuck::cast_slice_mut(&mut lo[b]),
            )
        }
    }

    /// Open a temporary scope. Allocations made through it are released
    /// when it is dropped.
    pub fn temporary(&mut self) -> TempScope<'_, 'a> {
        TempScope {
            saved_cursor: self.cursor,
            saved_previous: self.previous,
            arena: self,
        }
    }

    /// Zero the whole backing buffer and forget every allocation.
    ///
    /// Outstanding regions still resolve, but only to zeros or to whatever
    /// is allocated over them next.
    pub fn reset(&mut self) {
        self.data.fill(0);
        self.cursor = 0;
        self.previous = 0;
    }
}

impl fmt::Debug for Arena<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("cursor", &self.cursor)
            .field("previous", &self.previous)
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Guard for a temporary scope, see [`Arena::temporary`].
///
/// Derefs to the arena, so it allocates and resolves exactly like one and
/// can open nested scopes of its own.
pub struct TempScope<'s, 'a> {
    arena: &'s mut Arena<'a>,
    saved_cursor: usize,
    saved_previous: usize,
}

impl<'a> Deref for TempScope<'_, 'a> {
    type Target = Arena<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.arena
    }
}

impl<'a> DerefMut for TempScope<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.arena
    }
}

impl Drop for TempScope<'_, '_> {
    fn drop(&mut self) {
        let arena = &mut *self.arena;
        if arena.cursor > self.saved_cursor {
            arena.data[self.saved_cursor..arena.cursor].fill(0);
        }
        arena.cursor = self.saved_cursor;
        arena.previous = self.saved_previous;
    }
}

fn align_forward(addr: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    Some(addr.checked_add(align - 1)? & !(align - 1))
}
