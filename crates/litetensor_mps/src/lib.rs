pub mod metal_context;

pub use metal;

use metal::{CommandBuffer, MTLCommandBufferStatus, MTLResourceOptions};
use metal_context::get_metal_context;
use std::fmt;

#[derive(Debug)]
pub enum MpsError {
    DeviceNotFound,
    ContextNotInitialized,
    AllocationFailed(usize),
    CommandBufferFailed(String),
}

impl fmt::Display for MpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotFound => write!(f, "No Metal device available"),
            Self::ContextNotInitialized => write!(f, "Metal context is not initialized"),
            Self::AllocationFailed(size) => write!(f, "Metal buffer allocation of {} bytes failed", size),
            Self::CommandBufferFailed(msg) => write!(f, "Metal command buffer failed: {}", msg),
        }
    }
}

impl std::error::Error for MpsError {}

/// Allocates a buffer in shared storage mode, so its contents are addressable
/// from the host on unified memory.
pub fn new_shared_buffer(size: usize) -> Result<metal::Buffer, MpsError> {
    let context = get_metal_context()?;
    let buffer = context
        .device()
        .new_buffer(size.max(1) as u64, MTLResourceOptions::StorageModeShared);
    if buffer.contents().is_null() {
        return Err(MpsError::AllocationFailed(size));
    }
    Ok(buffer)
}

/// Commits an empty command buffer on the shared queue. The queue executes in
/// order, so the marker completes only after all previously committed work.
pub fn commit_marker() -> Result<CommandBuffer, MpsError> {
    let context = get_metal_context()?;
    let command_buffer = context.command_queue().new_command_buffer().to_owned();
    command_buffer.commit();
    Ok(command_buffer)
}

pub fn is_marker_complete(marker: &CommandBuffer) -> Result<bool, MpsError> {
    match marker.status() {
        MTLCommandBufferStatus::Completed => Ok(true),
        MTLCommandBufferStatus::Error => Err(MpsError::CommandBufferFailed("marker reported an error".into())),
        _ => Ok(false),
    }
}

pub fn wait_marker(marker: &CommandBuffer) -> Result<(), MpsError> {
    marker.wait_until_completed();
    match marker.status() {
        MTLCommandBufferStatus::Error => Err(MpsError::CommandBufferFailed("marker reported an error".into())),
        _ => Ok(()),
    }
}
