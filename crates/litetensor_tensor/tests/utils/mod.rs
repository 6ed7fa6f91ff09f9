#![allow(dead_code)]

use litetensor_core::{
    dtype::Element,
    error::Result,
    target::{auto_set_target, set_default_target, Target},
};
use litetensor_tensor::Tensor;

/// Host-resident tests read back through typed views.
pub fn setup_host() {
    set_default_target(Target::Host);
}

/// Picks the accelerator the crate was built for, if any.
pub fn setup_target() {
    auto_set_target();
}

pub fn setup_tensor<T: Element>(data: Vec<T>, dims: &[i64]) -> Result<Tensor> {
    Tensor::from_vec(data, dims)
}

/// `n` distinct small values of `T`, built from bytes so every element type works.
pub fn sample<T: Element + From<u8>>(n: usize) -> Vec<T> {
    (0..n).map(|i| T::from((i % 100) as u8 + 1)).collect()
}

#[macro_export]
macro_rules! test_element_types {
    ($($op:ident),* $(,)?) => {
        $(
            mod $op {
                use super::*;
                use paste::paste;

                paste! {
                    #[test]
                    fn f16() -> Result<()> {
                        test_functions::[<$op _test>]::<half::f16>()
                    }

                    #[test]
                    fn f32() -> Result<()> {
                        test_functions::[<$op _test>]::<f32>()
                    }

                    #[test]
                    fn f64() -> Result<()> {
                        test_functions::[<$op _test>]::<f64>()
                    }

                    #[test]
                    fn u8() -> Result<()> {
                        test_functions::[<$op _test>]::<u8>()
                    }

                    #[test]
                    fn u16() -> Result<()> {
                        test_functions::[<$op _test>]::<u16>()
                    }

                    #[test]
                    fn u32() -> Result<()> {
                        test_functions::[<$op _test>]::<u32>()
                    }

                    #[test]
                    fn u64() -> Result<()> {
                        test_functions::[<$op _test>]::<u64>()
                    }

                    #[test]
                    fn i16() -> Result<()> {
                        test_functions::[<$op _test>]::<i16>()
                    }

                    #[test]
                    fn i32() -> Result<()> {
                        test_functions::[<$op _test>]::<i32>()
                    }

                    #[test]
                    fn i64() -> Result<()> {
                        test_functions::[<$op _test>]::<i64>()
                    }
                }
            }
        )*
    };
}
