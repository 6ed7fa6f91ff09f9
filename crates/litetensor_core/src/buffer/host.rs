use crate::{
    buffer::Buffer,
    error::{Error, Result},
    target::Target,
};
use rayon::prelude::*;
use std::{
    alloc::{self, Layout},
    ffi::c_void,
    ptr::NonNull,
    slice,
};

/// Alignment of every host allocation; covers all element types and SIMD loads.
pub const HOST_ALIGNMENT: usize = 64;

const PARALLEL_COPY_THRESHOLD: usize = 1 << 20;
const PARALLEL_COPY_CHUNK: usize = 1 << 18;

pub struct HostBuffer {
    ptr: NonNull<u8>,
    size: usize,
}

unsafe impl Send for HostBuffer {}
unsafe impl Sync for HostBuffer {}

impl HostBuffer {
    /// Allocates `size` zeroed bytes. A zero-sized request still yields a
    /// non-null, aligned pointer.
    pub fn new(size: usize) -> Result<Self> {
        let layout = Self::layout_for(size)?;
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr).ok_or(Error::AllocationFailed {
            size,
            target: Target::Host,
        })?;
        Ok(Self { ptr, size })
    }

    fn layout_for(size: usize) -> Result<Layout> {
        Layout::from_size_align(size.max(1), HOST_ALIGNMENT)
            .map_err(|_| Error::InvalidArgument("Overflow in allocation".into()))
    }

    pub fn as_slice(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }
}

impl Drop for HostBuffer {
    fn drop(&mut self) {
        // layout was validated in `new`
        let layout = unsafe { Layout::from_size_align_unchecked(self.size.max(1), HOST_ALIGNMENT) };
        unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) };
    }
}

/// Copies `src` into `dst`, splitting large copies across the rayon pool.
pub fn host_copy(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());
    if src.len() < PARALLEL_COPY_THRESHOLD {
        dst.copy_from_slice(src);
        return;
    }
    dst.par_chunks_mut(PARALLEL_COPY_CHUNK)
        .zip(src.par_chunks(PARALLEL_COPY_CHUNK))
        .for_each(|(d, s)| d.copy_from_slice(s));
}

impl Buffer for HostBuffer {
    fn as_ptr(&self) -> *const c_void {
        self.ptr.as_ptr() as *const _
    }

    fn as_mut_ptr(&mut self) -> *mut c_void {
        self.ptr.as_ptr() as *mut _
    }

    fn len(&self) -> usize {
        self.size
    }

    fn target(&self) -> Target {
        Target::Host
    }

    unsafe fn copy_from(&mut self, other: &dyn Buffer, size_in_bytes: usize) -> Result<()> {
        if !other.is_host_accessible() {
            return Err(Error::NotHostAccessible(other.target()));
        }
        if size_in_bytes > other.len() {
            return Err(Error::InvalidArgument(format!(
                "Size mismatch in copy_from: requested {}, source holds {}",
                size_in_bytes,
                other.len()
            )));
        }
        self.copy_from_host(other.as_ptr(), size_in_bytes)
    }

    unsafe fn copy_from_host(&mut self, src: *const c_void, size_in_bytes: usize) -> Result<()> {
        if size_in_bytes > self.size {
            return Err(Error::InvalidArgument(format!(
                "Size mismatch in copy_from_host: requested {}, available {}",
                size_in_bytes, self.size
            )));
        }
        let src = slice::from_raw_parts(src as *const u8, size_in_bytes);
        host_copy(&mut self.as_mut_slice()[..size_in_bytes], src);
        Ok(())
    }

    unsafe fn copy_to_host(&self, dest: *mut c_void, size_in_bytes: usize) -> Result<()> {
        if size_in_bytes > self.size {
            return Err(Error::InvalidArgument(format!(
                "Size mismatch in copy_to_host: requested {}, available {}",
                size_in_bytes, self.size
            )));
        }
        let dest = slice::from_raw_parts_mut(dest as *mut u8, size_in_bytes);
        host_copy(dest, &self.as_slice()[..size_in_bytes]);
        Ok(())
    }
}
