pub use crate::core::{
    ddim::{flatten_to_1d, flatten_to_2d, product, slice_dims, DDim},
    dtype::{DType, Element},
    error::{Error, Result},
    event::{Event, EventTree, HostEvent},
    lod::LoD,
    target::{auto_set_target, get_default_target, set_default_target, Target},
};
pub use crate::tensor::Tensor;
pub use crate::{bf16, f16};
