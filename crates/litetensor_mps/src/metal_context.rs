use crate::MpsError;
use metal::{CommandQueue, Device};
use std::sync::OnceLock;

pub struct MetalContext {
    device: Device,
    command_queue: CommandQueue,
}

static METAL_CONTEXT: OnceLock<MetalContext> = OnceLock::new();

impl MetalContext {
    fn new() -> Result<Self, MpsError> {
        let device = Device::system_default().ok_or(MpsError::DeviceNotFound)?;
        let command_queue = device.new_command_queue();
        Ok(Self { device, command_queue })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn command_queue(&self) -> &CommandQueue {
        &self.command_queue
    }
}

pub fn initialize_metal() -> Result<(), MpsError> {
    if METAL_CONTEXT.get().is_none() {
        let context = MetalContext::new()?;
        let _ = METAL_CONTEXT.set(context);
    }
    Ok(())
}

pub fn get_metal_context() -> Result<&'static MetalContext, MpsError> {
    initialize_metal()?;
    METAL_CONTEXT.get().ok_or(MpsError::ContextNotInitialized)
}
