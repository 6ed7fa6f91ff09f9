#![allow(dead_code)]

use litetensor_core::{dtype::Element, error::Result, storage::Storage, target::Target};
use std::mem;

/// Host storage holding `data`, sized exactly.
pub fn setup_storage<T: Element>(data: &[T]) -> Result<Storage> {
    let storage = Storage::new();
    storage.reset_lazy(Target::Host, mem::size_of_val(data))?;
    storage.copy_from_slice(data)?;
    Ok(storage)
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
                    fn bf16() -> Result<()> {
                        test_functions::[<$op _test>]::<half::bf16>()
                    }

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
