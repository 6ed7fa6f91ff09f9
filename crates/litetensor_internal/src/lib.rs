pub mod prelude;

pub use litetensor_core as core;
pub use litetensor_tensor as tensor;

pub use litetensor_core::dtype::{bf16, bfloat16, f16, float16, float32, float64, int16, int32, int64, int8, uint16, uint32, uint64, uint8};
