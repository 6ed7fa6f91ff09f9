pub mod host;
#[cfg(feature = "cuda")]
pub mod cuda;
#[cfg(feature = "mps")]
pub mod mps;

use crate::{error::Result, target::Target};
use std::ffi::c_void;

/// A raw block of bytes resident on one target. Dropping the buffer frees it.
pub trait Buffer: Send + Sync {
    fn as_ptr(&self) -> *const c_void;
    fn as_mut_ptr(&mut self) -> *mut c_void;
    /// Capacity in bytes.
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn target(&self) -> Target;
    fn is_host_accessible(&self) -> bool {
        self.target().is_host_accessible()
    }

    /// # Safety
    /// Requires `other` to be readable by this buffer's target and no memory overlap
    unsafe fn copy_from(&mut self, other: &dyn Buffer, size_in_bytes: usize) -> Result<()>;

    /// # Safety
    /// Requires valid source pointer for `size_in_bytes` reads with no memory overlap
    unsafe fn copy_from_host(&mut self, src: *const c_void, size_in_bytes: usize) -> Result<()>;

    /// # Safety
    /// Requires valid destination pointer for `size_in_bytes` writes with no memory overlap
    unsafe fn copy_to_host(&self, dest: *mut c_void, size_in_bytes: usize) -> Result<()>;
}
