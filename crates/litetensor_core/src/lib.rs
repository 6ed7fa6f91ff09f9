pub mod backend;
pub mod buffer;
pub mod ddim;
pub mod dtype;
pub mod error;
pub mod event;
pub mod lod;
pub mod storage;
pub mod target;

#[cfg(feature = "cuda")]
pub use litetensor_cuda as cuda;
#[cfg(feature = "mps")]
pub use litetensor_mps as mps;
