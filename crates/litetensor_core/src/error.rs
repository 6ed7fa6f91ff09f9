use crate::target::Target;
#[cfg(feature = "cuda")]
use litetensor_cuda::cuda_error;
#[cfg(feature = "mps")]
use litetensor_mps::MpsError;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    OutOfMemory,
    AllocationFailed {
        size: usize,
        target: Target,
    },
    TargetMismatch {
        expected: Target,
        got: Target,
    },
    InvalidTarget(String),
    InvalidArgument(String),
    #[cfg(feature = "cuda")]
    CudaError(String),
    #[cfg(feature = "mps")]
    MpsError(String),
    // storage
    NotInitialized,
    NotHostAccessible(Target),
    InsufficientCapacity {
        required: usize,
        capacity: usize,
    },
    BufferLocked,
    Lock,
    // shape
    InvalidShape {
        message: String,
    },
    SliceOutOfRange {
        begin: usize,
        end: usize,
        ndim: usize,
    },
    InvalidLoD(String),
    // sync
    SyncFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "Out of memory"),
            Self::AllocationFailed { size, target } => {
                write!(f, "Allocation of {} bytes failed on {}", size, target.name())
            }
            Self::TargetMismatch { expected, got } => {
                write!(f, "Target mismatch: expected {}, got {}", expected.name(), got.name())
            }
            Self::InvalidTarget(msg) => write!(f, "Invalid target: {}", msg),
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            #[cfg(feature = "cuda")]
            Self::CudaError(msg) => write!(f, "CUDA error: {}", msg),
            #[cfg(feature = "mps")]
            Self::MpsError(msg) => write!(f, "MPS error: {}", msg),

            Self::NotInitialized => write!(f, "Storage is not initialized"),
            Self::NotHostAccessible(target) => {
                write!(f, "Storage on {} is not accessible from the host", target.name())
            }
            Self::InsufficientCapacity { required, capacity } => {
                write!(
                    f,
                    "Insufficient capacity: {} bytes required, storage holds {} bytes",
                    required, capacity
                )
            }
            Self::BufferLocked => write!(f, "Buffer is locked"),
            Self::Lock => write!(f, "Buffer lock is poisoned"),

            Self::InvalidShape { message } => {
                write!(f, "Invalid shape: {}", message)
            }
            Self::SliceOutOfRange { begin, end, ndim } => {
                write!(
                    f,
                    "Slice out of range: [{}, {}) is not valid for a shape with {} dimensions",
                    begin, end, ndim
                )
            }
            Self::InvalidLoD(msg) => write!(f, "Invalid LoD: {}", msg),
            Self::SyncFailed(msg) => write!(f, "Event synchronization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    #[cfg(feature = "cuda")]
    pub fn from_cuda_error(error_code: i32) -> Self {
        if error_code == 2 {
            Self::OutOfMemory
        } else {
            Self::CudaError(cuda_error(error_code))
        }
    }
}

impl Error {
    #[cfg(feature = "mps")]
    pub fn from_mps_error(error: MpsError) -> Self {
        match error {
            MpsError::AllocationFailed(size) => Self::AllocationFailed {
                size,
                target: Target::Mps,
            },
            other => Self::MpsError(other.to_string()),
        }
    }
}
