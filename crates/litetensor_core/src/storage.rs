//! Shared storage handle backing one or more tensors.
//!
//! A [`Storage`] is held behind an `Arc` by every tensor aliasing it. It starts
//! unbound and is bound to a buffer by the first [`reset_lazy`](Storage::reset_lazy).
//! Access goes through a non-blocking `RwLock`: contention is reported as
//! [`Error::BufferLocked`] rather than waited on, so holding a view of one alias
//! while mutating another on the same thread fails instead of deadlocking.

use crate::{
    backend::backend,
    buffer::Buffer,
    dtype::Element,
    error::{Error, Result},
    target::Target,
};
use std::{
    fmt,
    marker::PhantomData,
    mem, ptr, slice,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError,
    },
};
use tracing::{debug, trace};

type Slot = Option<Box<dyn Buffer>>;

pub struct Storage {
    slot: RwLock<Slot>,
    initialized: AtomicBool,
    capacity: AtomicUsize,
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
            initialized: AtomicBool::new(false),
            capacity: AtomicUsize::new(0),
        }
    }

    /// Whether a buffer with a non-null data pointer is bound.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Capacity of the bound buffer in bytes, `0` while unbound.
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    pub fn target(&self) -> Result<Option<Target>> {
        Ok(self.read()?.as_ref().map(|buffer| buffer.target()))
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, Slot>> {
        self.slot.try_read().map_err(|e| match e {
            TryLockError::WouldBlock => Error::BufferLocked,
            TryLockError::Poisoned(_) => Error::Lock,
        })
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Slot>> {
        self.slot.try_write().map_err(|e| match e {
            TryLockError::WouldBlock => Error::BufferLocked,
            TryLockError::Poisoned(_) => Error::Lock,
        })
    }

    /// Ensures at least `size_in_bytes` are bound on `target`.
    ///
    /// A new buffer is allocated when nothing is bound, when the bound buffer
    /// lives on another target, or when it is too small. Otherwise this is a
    /// no-op: capacity never shrinks. A replaced buffer's contents are not
    /// carried over, and on allocation failure the current buffer stays bound.
    pub fn reset_lazy(&self, target: Target, size_in_bytes: usize) -> Result<()> {
        let mut slot = self.write()?;

        if let Some(buffer) = slot.as_ref() {
            if buffer.target() == target && buffer.len() >= size_in_bytes {
                trace!(target = %target, bytes = size_in_bytes, capacity = buffer.len(), "storage already sufficient");
                return Ok(());
            }
        }

        let buffer = backend(target).allocate(target, size_in_bytes)?;
        debug!(
            target = %target,
            bytes = size_in_bytes,
            replaced = slot.is_some(),
            "bound storage buffer"
        );
        self.capacity.store(buffer.len(), Ordering::Release);
        self.initialized.store(!buffer.as_ptr().is_null(), Ordering::Release);
        *slot = Some(buffer);
        Ok(())
    }

    /// Deep-copies the whole bound buffer of `other` into this storage,
    /// adopting its target and capacity.
    pub fn copy_from(&self, other: &Storage) -> Result<()> {
        if ptr::eq(self, other) {
            return Ok(());
        }

        let src = other.read()?;
        let src = src.as_deref().ok_or(Error::NotInitialized)?;
        let (target, size) = (src.target(), src.len());

        self.reset_lazy(target, size)?;

        let mut dst = self.write()?;
        let dst = dst.as_deref_mut().ok_or(Error::NotInitialized)?;
        backend(target).copy(dst, src, size)?;
        trace!(target = %target, bytes = size, "copied storage");
        Ok(())
    }

    /// Typed read view over the first `len` elements.
    pub fn view<T: Element>(&self, len: usize) -> Result<StorageView<'_, T>> {
        let guard = self.read()?;
        let ptr = {
            let buffer = guard.as_deref().ok_or(Error::NotInitialized)?;
            check_host_view::<T>(buffer, len)?;
            buffer.as_ptr() as *const T
        };
        Ok(StorageView {
            _guard: guard,
            ptr,
            len,
            _marker: PhantomData,
        })
    }

    /// Typed mutable view over the first `len` elements.
    pub fn view_mut<T: Element>(&self, len: usize) -> Result<StorageViewMut<'_, T>> {
        let mut guard = self.write()?;
        let ptr = {
            let buffer = guard.as_deref_mut().ok_or(Error::NotInitialized)?;
            check_host_view::<T>(buffer, len)?;
            buffer.as_mut_ptr() as *mut T
        };
        Ok(StorageViewMut {
            _guard: guard,
            ptr,
            len,
            _marker: PhantomData,
        })
    }

    /// Raw pointer to the bound buffer on its own target, valid for `len`
    /// elements. The pointer outlives any lock; the caller serializes access.
    pub fn data_ptr<T: Element>(&self, len: usize) -> Result<*const T> {
        let guard = self.read()?;
        let buffer = guard.as_deref().ok_or(Error::NotInitialized)?;
        check_capacity::<T>(buffer, len)?;
        Ok(buffer.as_ptr() as *const T)
    }

    pub fn mutable_data_ptr<T: Element>(&self, len: usize) -> Result<*mut T> {
        let mut guard = self.write()?;
        let buffer = guard.as_deref_mut().ok_or(Error::NotInitialized)?;
        check_capacity::<T>(buffer, len)?;
        Ok(buffer.as_mut_ptr() as *mut T)
    }

    /// Writes `data` to the start of the bound buffer, from the host to any target.
    pub fn copy_from_slice<T: Element>(&self, data: &[T]) -> Result<()> {
        let mut guard = self.write()?;
        let buffer = guard.as_deref_mut().ok_or(Error::NotInitialized)?;
        let size_in_bytes = check_capacity::<T>(buffer, data.len())?;
        unsafe { buffer.copy_from_host(data.as_ptr() as *const std::ffi::c_void, size_in_bytes) }
    }

    /// Copies the first `len` elements to a host vector, from any target.
    pub fn to_vec<T: Element>(&self, len: usize) -> Result<Vec<T>> {
        let guard = self.read()?;
        let buffer = guard.as_deref().ok_or(Error::NotInitialized)?;
        let size_in_bytes = check_capacity::<T>(buffer, len)?;

        let mut out = vec![T::default(); len];
        unsafe {
            buffer.copy_to_host(out.as_mut_ptr() as *mut std::ffi::c_void, size_in_bytes)?;
        }
        Ok(out)
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("initialized", &self.is_initialized())
            .field("capacity", &self.capacity())
            .finish()
    }
}

fn check_capacity<T: Element>(buffer: &dyn Buffer, len: usize) -> Result<usize> {
    let required = len
        .checked_mul(mem::size_of::<T>())
        .ok_or_else(|| Error::InvalidArgument("Overflow in view size".into()))?;
    if required > buffer.len() {
        return Err(Error::InsufficientCapacity {
            required,
            capacity: buffer.len(),
        });
    }
    Ok(required)
}

fn check_host_view<T: Element>(buffer: &dyn Buffer, len: usize) -> Result<()> {
    if !buffer.is_host_accessible() {
        return Err(Error::NotHostAccessible(buffer.target()));
    }
    check_capacity::<T>(buffer, len)?;
    debug_assert_eq!(buffer.as_ptr() as usize % mem::align_of::<T>(), 0);
    Ok(())
}

/// Read view into a storage block. Holds the storage read lock.
pub struct StorageView<'a, T: Element> {
    _guard: RwLockReadGuard<'a, Slot>,
    ptr: *const T,
    len: usize,
    _marker: PhantomData<&'a [T]>,
}

impl<T: Element> std::ops::Deref for StorageView<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl<T: Element> fmt::Debug for StorageView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

/// Mutable view into a storage block. Holds the storage write lock.
pub struct StorageViewMut<'a, T: Element> {
    _guard: RwLockWriteGuard<'a, Slot>,
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

impl<T: Element> std::ops::Deref for StorageViewMut<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl<T: Element> std::ops::DerefMut for StorageViewMut<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr, self.len) }
    }
}

impl<T: Element> fmt::Debug for StorageViewMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
