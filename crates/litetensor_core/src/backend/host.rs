use crate::{
    backend::{ensure_target, TargetBackend},
    buffer::{host::HostBuffer, Buffer},
    error::{Error, Result},
    event::{Event, EventHandle},
    target::Target,
};
use tracing::debug;

/// Host memory and host-signaled events.
///
/// Host work runs synchronously on the calling thread, so a recorded event is
/// already complete. Events created from a [`HostEvent`](crate::event::HostEvent)
/// complete when another thread signals them.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostBackend;

impl TargetBackend for HostBackend {
    fn name(&self) -> &'static str {
        "host"
    }

    fn allocate(&self, target: Target, size_in_bytes: usize) -> Result<Box<dyn Buffer>> {
        ensure_target(Target::Host, target)?;
        let buffer = HostBuffer::new(size_in_bytes)?;
        debug!(target = %target, bytes = size_in_bytes, "allocated host buffer");
        Ok(Box::new(buffer))
    }

    fn record_event(&self, target: Target) -> Result<Event> {
        ensure_target(Target::Host, target)?;
        Ok(Event::completed())
    }

    fn query_event(&self, event: &Event) -> Result<bool> {
        match event.handle() {
            EventHandle::Host(host) => Ok(host.is_signaled()),
            #[allow(unreachable_patterns)]
            _ => Err(Error::TargetMismatch {
                expected: Target::Host,
                got: event.target(),
            }),
        }
    }

    fn sync_event(&self, event: &Event) -> Result<()> {
        match event.handle() {
            EventHandle::Host(host) => {
                host.wait();
                Ok(())
            }
            #[allow(unreachable_patterns)]
            _ => Err(Error::TargetMismatch {
                expected: Target::Host,
                got: event.target(),
            }),
        }
    }
}
