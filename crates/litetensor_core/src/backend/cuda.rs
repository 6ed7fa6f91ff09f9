use crate::{
    backend::TargetBackend,
    buffer::{
        cuda::{set_device, CudaBuffer},
        Buffer,
    },
    error::{Error, Result},
    event::{Event, EventHandle},
    target::Target,
};
use litetensor_cuda::{
    cuda_event_create, cuda_event_destroy, cuda_event_query, cuda_event_record, cuda_event_synchronize,
    CudaEventHandle, CUDA_ERROR_NOT_READY, CUDA_SUCCESS,
};
use std::sync::Arc;
use tracing::debug;

/// An event recorded on the default stream of one CUDA device. Destroyed when
/// the last [`Event`] holding it is dropped.
pub struct CudaEvent {
    raw: CudaEventHandle,
    device_id: usize,
}

unsafe impl Send for CudaEvent {}
unsafe impl Sync for CudaEvent {}

impl CudaEvent {
    fn record(device_id: usize) -> Result<Self> {
        set_device(device_id)?;

        let mut raw = std::ptr::null_mut();
        let status = unsafe { cuda_event_create(&mut raw) };
        if status != CUDA_SUCCESS {
            return Err(Error::from_cuda_error(status));
        }
        let event = Self { raw, device_id };

        let status = unsafe { cuda_event_record(event.raw, std::ptr::null_mut()) };
        if status != CUDA_SUCCESS {
            return Err(Error::from_cuda_error(status));
        }
        Ok(event)
    }

    pub fn device_id(&self) -> usize {
        self.device_id
    }

    fn query(&self) -> Result<bool> {
        match unsafe { cuda_event_query(self.raw) } {
            CUDA_SUCCESS => Ok(true),
            CUDA_ERROR_NOT_READY => Ok(false),
            status => Err(Error::SyncFailed(Error::from_cuda_error(status).to_string())),
        }
    }

    fn synchronize(&self) -> Result<()> {
        let status = unsafe { cuda_event_synchronize(self.raw) };
        if status != CUDA_SUCCESS {
            return Err(Error::SyncFailed(Error::from_cuda_error(status).to_string()));
        }
        Ok(())
    }
}

impl Drop for CudaEvent {
    fn drop(&mut self) {
        unsafe {
            cuda_event_destroy(self.raw);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CudaBackend;

fn cuda_event(event: &Event) -> Result<&CudaEvent> {
    match event.handle() {
        EventHandle::Cuda(cuda) => Ok(cuda.as_ref()),
        _ => Err(Error::TargetMismatch {
            expected: Target::Cuda(0),
            got: event.target(),
        }),
    }
}

impl TargetBackend for CudaBackend {
    fn name(&self) -> &'static str {
        "cuda"
    }

    fn allocate(&self, target: Target, size_in_bytes: usize) -> Result<Box<dyn Buffer>> {
        let Target::Cuda(device_id) = target else {
            return Err(Error::TargetMismatch {
                expected: Target::Cuda(0),
                got: target,
            });
        };
        let buffer = CudaBuffer::new(size_in_bytes, device_id)?;
        debug!(target = %target, bytes = size_in_bytes, "allocated cuda buffer");
        Ok(Box::new(buffer))
    }

    fn record_event(&self, target: Target) -> Result<Event> {
        let Target::Cuda(device_id) = target else {
            return Err(Error::TargetMismatch {
                expected: Target::Cuda(0),
                got: target,
            });
        };
        let event = CudaEvent::record(device_id)?;
        Ok(Event::new(target, EventHandle::Cuda(Arc::new(event))))
    }

    fn query_event(&self, event: &Event) -> Result<bool> {
        cuda_event(event)?.query()
    }

    fn sync_event(&self, event: &Event) -> Result<()> {
        cuda_event(event)?.synchronize()
    }
}
