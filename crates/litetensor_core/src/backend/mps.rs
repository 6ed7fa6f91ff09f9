use crate::{
    backend::{ensure_target, TargetBackend},
    buffer::{mps::MpsBuffer, Buffer},
    error::{Error, Result},
    event::{Event, EventHandle},
    target::Target,
};
use litetensor_mps::{commit_marker, is_marker_complete, metal::CommandBuffer, wait_marker};
use std::sync::Arc;
use tracing::debug;

/// A committed marker command buffer on the shared Metal queue.
#[derive(Clone)]
pub struct MpsEvent {
    marker: Arc<CommandBuffer>,
}

unsafe impl Send for MpsEvent {}
unsafe impl Sync for MpsEvent {}

#[derive(Debug, Clone, Copy, Default)]
pub struct MpsBackend;

fn mps_event(event: &Event) -> Result<&MpsEvent> {
    match event.handle() {
        EventHandle::Mps(mps) => Ok(mps),
        #[allow(unreachable_patterns)]
        _ => Err(Error::TargetMismatch {
            expected: Target::Mps,
            got: event.target(),
        }),
    }
}

impl TargetBackend for MpsBackend {
    fn name(&self) -> &'static str {
        "mps"
    }

    fn allocate(&self, target: Target, size_in_bytes: usize) -> Result<Box<dyn Buffer>> {
        ensure_target(Target::Mps, target)?;
        let buffer = MpsBuffer::new(size_in_bytes)?;
        debug!(target = %target, bytes = size_in_bytes, "allocated mps buffer");
        Ok(Box::new(buffer))
    }

    fn record_event(&self, target: Target) -> Result<Event> {
        ensure_target(Target::Mps, target)?;
        let marker = commit_marker().map_err(Error::from_mps_error)?;
        Ok(Event::new(
            target,
            EventHandle::Mps(MpsEvent {
                marker: Arc::new(marker),
            }),
        ))
    }

    fn query_event(&self, event: &Event) -> Result<bool> {
        is_marker_complete(&mps_event(event)?.marker).map_err(|e| Error::SyncFailed(e.to_string()))
    }

    fn sync_event(&self, event: &Event) -> Result<()> {
        wait_marker(&mps_event(event)?.marker).map_err(|e| Error::SyncFailed(e.to_string()))
    }
}
