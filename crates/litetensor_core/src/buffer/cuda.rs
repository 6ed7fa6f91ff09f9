use crate::{
    buffer::Buffer,
    error::{Error, Result},
    target::Target,
};
use litetensor_cuda::{
    cuda_free, cuda_get_device, cuda_malloc, cuda_memcpy_d2d, cuda_memcpy_d2h, cuda_memcpy_h2d, cuda_set_device,
    CUDA_SUCCESS,
};
use std::ffi::c_void;

pub struct CudaBuffer {
    ptr: *mut c_void,
    size: usize,
    device_id: usize,
}

unsafe impl Send for CudaBuffer {}
unsafe impl Sync for CudaBuffer {}

/// Makes `device_id` current on the calling thread, skipping the switch when
/// it already is.
pub(crate) fn set_device(device_id: usize) -> Result<()> {
    let mut current = -1;
    if unsafe { cuda_get_device(&mut current) } == CUDA_SUCCESS && current == device_id as i32 {
        return Ok(());
    }

    let status = unsafe { cuda_set_device(device_id as i32) };
    if status != 0 {
        return Err(Error::InvalidTarget(format!(
            "Failed to set CUDA device {}: {}",
            device_id,
            Error::from_cuda_error(status)
        )));
    }
    Ok(())
}

impl CudaBuffer {
    pub fn new(size: usize, device_id: usize) -> Result<Self> {
        set_device(device_id)?;

        let mut ptr = std::ptr::null_mut();
        let status = unsafe { cuda_malloc(&mut ptr, size.max(1)) };
        if status != 0 {
            return Err(match Error::from_cuda_error(status) {
                Error::OutOfMemory => Error::AllocationFailed {
                    size,
                    target: Target::Cuda(device_id),
                },
                other => other,
            });
        }
        Ok(Self { ptr, size, device_id })
    }

    pub fn device_id(&self) -> usize {
        self.device_id
    }
}

impl Drop for CudaBuffer {
    fn drop(&mut self) {
        if set_device(self.device_id).is_ok() {
            unsafe {
                cuda_free(self.ptr);
            }
        }
    }
}

impl Buffer for CudaBuffer {
    fn as_ptr(&self) -> *const c_void {
        self.ptr
    }

    fn as_mut_ptr(&mut self) -> *mut c_void {
        self.ptr
    }

    fn len(&self) -> usize {
        self.size
    }

    fn target(&self) -> Target {
        Target::Cuda(self.device_id)
    }

    unsafe fn copy_from(&mut self, other: &dyn Buffer, size_in_bytes: usize) -> Result<()> {
        if size_in_bytes > other.len() || size_in_bytes > self.len() {
            return Err(Error::InvalidArgument("Copy size exceeds buffer dimensions".into()));
        }

        set_device(self.device_id)?;

        let status = match other.target() {
            Target::Host => cuda_memcpy_h2d(self.ptr, other.as_ptr(), size_in_bytes),
            // unified addressing resolves peer devices
            Target::Cuda(_) => cuda_memcpy_d2d(self.ptr, other.as_ptr(), size_in_bytes),
            #[cfg(feature = "mps")]
            Target::Mps => {
                return Err(Error::InvalidArgument("Direct copy from MPS to CUDA is not supported".into()));
            }
        };

        if status != 0 {
            return Err(Error::from_cuda_error(status));
        }

        Ok(())
    }

    unsafe fn copy_from_host(&mut self, src: *const c_void, size_in_bytes: usize) -> Result<()> {
        if size_in_bytes > self.size {
            return Err(Error::InvalidArgument(format!(
                "Size mismatch in copy_from_host: requested {}, available {}",
                size_in_bytes, self.size
            )));
        }

        set_device(self.device_id)?;

        let status = cuda_memcpy_h2d(self.ptr, src, size_in_bytes);
        if status != 0 {
            return Err(Error::from_cuda_error(status));
        }

        Ok(())
    }

    unsafe fn copy_to_host(&self, dest: *mut c_void, size_in_bytes: usize) -> Result<()> {
        if size_in_bytes > self.size {
            return Err(Error::InvalidArgument(format!(
                "Size mismatch in copy_to_host: requested {}, available {}",
                size_in_bytes, self.size
            )));
        }

        set_device(self.device_id)?;

        let status = cuda_memcpy_d2h(dest, self.ptr, size_in_bytes);
        if status != 0 {
            return Err(Error::from_cuda_error(status));
        }

        Ok(())
    }
}
