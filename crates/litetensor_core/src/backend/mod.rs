//! Per-target backends.
//!
//! Every [`Target`] is served by one [`TargetBackend`], selected at runtime by
//! [`backend`]. A backend allocates buffers on its target, copies between
//! buffers and records and waits on completion events. Freeing happens when a
//! buffer is dropped.

#[cfg(feature = "cuda")]
pub mod cuda;
pub mod host;
#[cfg(feature = "mps")]
pub mod mps;

#[cfg(feature = "cuda")]
pub use cuda::CudaBackend;
pub use host::HostBackend;
#[cfg(feature = "mps")]
pub use mps::MpsBackend;

use crate::{
    buffer::{host::HostBuffer, Buffer},
    error::{Error, Result},
    event::Event,
    target::Target,
};
use tracing::warn;

pub trait TargetBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Allocates `size_in_bytes` on `target`.
    fn allocate(&self, target: Target, size_in_bytes: usize) -> Result<Box<dyn Buffer>>;

    /// Records an event that completes once all work submitted to `target`
    /// so far has finished.
    fn record_event(&self, target: Target) -> Result<Event>;

    /// Returns whether `event` has completed, without blocking.
    fn query_event(&self, event: &Event) -> Result<bool>;

    /// Blocks until `event` has completed.
    fn sync_event(&self, event: &Event) -> Result<()>;

    /// Copies the first `size_in_bytes` of `src` into `dst`, whichever targets
    /// they live on.
    fn copy(&self, dst: &mut dyn Buffer, src: &dyn Buffer, size_in_bytes: usize) -> Result<()> {
        if size_in_bytes > src.len() || size_in_bytes > dst.len() {
            return Err(Error::InvalidArgument(format!(
                "Copy of {} bytes exceeds buffer dimensions (src {}, dst {})",
                size_in_bytes,
                src.len(),
                dst.len()
            )));
        }

        match (dst.is_host_accessible(), src.is_host_accessible()) {
            (true, true) => unsafe { dst.copy_from(src, size_in_bytes) },
            (false, true) => unsafe { dst.copy_from_host(src.as_ptr(), size_in_bytes) },
            (true, false) => unsafe { src.copy_to_host(dst.as_mut_ptr(), size_in_bytes) },
            (false, false) => {
                if dst.target() == src.target() {
                    return unsafe { dst.copy_from(src, size_in_bytes) };
                }
                // Try a direct copy first, fall back to host staging
                match unsafe { dst.copy_from(src, size_in_bytes) } {
                    Ok(()) => Ok(()),
                    Err(_) => {
                        warn!(
                            src = %src.target(),
                            dst = %dst.target(),
                            bytes = size_in_bytes,
                            "staging cross-target copy through host memory"
                        );
                        let mut staging = HostBuffer::new(size_in_bytes)?;
                        unsafe {
                            src.copy_to_host(staging.as_mut_ptr(), size_in_bytes)?;
                            dst.copy_from_host(staging.as_ptr(), size_in_bytes)
                        }
                    }
                }
            }
        }
    }
}

/// Returns the backend serving `target`.
pub fn backend(target: Target) -> &'static dyn TargetBackend {
    match target {
        Target::Host => &HostBackend,
        #[cfg(feature = "cuda")]
        Target::Cuda(_) => &CudaBackend,
        #[cfg(feature = "mps")]
        Target::Mps => &MpsBackend,
    }
}

pub(crate) fn ensure_target(expected: Target, got: Target) -> Result<()> {
    if expected != got {
        return Err(Error::TargetMismatch { expected, got });
    }
    Ok(())
}
