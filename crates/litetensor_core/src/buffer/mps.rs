use crate::{
    buffer::{host::host_copy, Buffer},
    error::{Error, Result},
    target::Target,
};
use litetensor_mps::{metal, new_shared_buffer};
use std::{ffi::c_void, slice};

pub struct MpsBuffer {
    buffer: metal::Buffer,
    size: usize,
}

unsafe impl Send for MpsBuffer {}
unsafe impl Sync for MpsBuffer {}

impl MpsBuffer {
    pub fn new(size: usize) -> Result<Self> {
        let buffer = new_shared_buffer(size).map_err(Error::from_mps_error)?;
        Ok(Self { buffer, size })
    }

    pub fn raw(&self) -> &metal::Buffer {
        &self.buffer
    }

    fn contents(&self) -> *mut u8 {
        self.buffer.contents() as *mut u8
    }
}

impl Buffer for MpsBuffer {
    fn as_ptr(&self) -> *const c_void {
        self.buffer.contents() as *const _
    }

    fn as_mut_ptr(&mut self) -> *mut c_void {
        self.buffer.contents()
    }

    fn len(&self) -> usize {
        self.size
    }

    fn target(&self) -> Target {
        Target::Mps
    }

    unsafe fn copy_from(&mut self, other: &dyn Buffer, size_in_bytes: usize) -> Result<()> {
        if !other.is_host_accessible() {
            return Err(Error::InvalidArgument(format!(
                "Direct copy from {} to MPS is not supported",
                other.target().name()
            )));
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
        let dst = slice::from_raw_parts_mut(self.contents(), size_in_bytes);
        host_copy(dst, slice::from_raw_parts(src as *const u8, size_in_bytes));
        Ok(())
    }

    unsafe fn copy_to_host(&self, dest: *mut c_void, size_in_bytes: usize) -> Result<()> {
        if size_in_bytes > self.size {
            return Err(Error::InvalidArgument(format!(
                "Size mismatch in copy_to_host: requested {}, available {}",
                size_in_bytes, self.size
            )));
        }
        let src = slice::from_raw_parts(self.contents() as *const u8, size_in_bytes);
        host_copy(slice::from_raw_parts_mut(dest as *mut u8, size_in_bytes), src);
        Ok(())
    }
}
