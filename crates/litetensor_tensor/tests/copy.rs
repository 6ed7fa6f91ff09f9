mod utils;

use litetensor_core::{
    error::{Error, Result},
    target::Target,
};
use litetensor_tensor::Tensor;
use utils::{setup_host, setup_target, setup_tensor};

#[test]
fn copy_data_from_is_independent() -> Result<()> {
    setup_host();
    let mut x = setup_tensor(vec![1i32, 2, 3, 4, 5, 6], &[2, 3])?;
    x.set_lod(vec![vec![0, 2]]);

    let mut y = Tensor::new();
    y.copy_data_from(&x)?;

    assert!(!y.is_shared_with(&x));
    assert_eq!(y.dims(), x.dims());
    assert_eq!(y.lod(), x.lod());
    assert_eq!(y.dtype(), x.dtype());
    assert_eq!(&*y.data::<i32>()?, &[1, 2, 3, 4, 5, 6]);

    x.mutable_data::<i32>()?[0] = 100;
    assert_eq!(y.data::<i32>()?[0], 1);

    y.mutable_data::<i32>()?[5] = -6;
    assert_eq!(x.data::<i32>()?[5], 6);

    Ok(())
}

#[test]
fn copy_adopts_source_capacity() -> Result<()> {
    setup_host();
    let mut x = Tensor::new();
    x.resize([32]);
    x.mutable_data::<f64>()?;
    x.resize([4]);

    let mut y = Tensor::new();
    y.copy_data_from(&x)?;

    assert_eq!(y.memory_size(), 256);
    assert_eq!(y.target(), Target::Host);

    Ok(())
}

#[test]
fn copy_is_visible_to_aliases_of_destination() -> Result<()> {
    setup_host();
    let x = setup_tensor(vec![9u16, 8, 7], &[3])?;

    let mut y = setup_tensor(vec![0u16; 3], &[3])?;
    let mut z = Tensor::new();
    z.share_data_with(&y);

    y.copy_data_from(&x)?;

    assert!(z.is_shared_with(&y));
    assert_eq!(&*z.data::<u16>()?, &[9, 8, 7]);

    Ok(())
}

#[test]
fn copy_from_uninitialized() -> Result<()> {
    setup_host();
    let mut x = Tensor::new();
    x.resize([4]);

    let mut y = setup_tensor(vec![1.0f32, 2.0], &[2])?;
    assert!(matches!(y.copy_data_from(&x), Err(Error::NotInitialized)));

    assert_eq!(y.dims(), &[2]);
    assert_eq!(&*y.data::<f32>()?, &[1.0, 2.0]);

    Ok(())
}

#[test]
fn copy_from_alias_copies_metadata() -> Result<()> {
    setup_host();
    let x = setup_tensor(vec![1u64, 2, 3, 4], &[4])?;
    let mut y = Tensor::new();
    y.share_data_with(&x);
    y.resize([2, 2]);

    y.copy_data_from(&x)?;

    assert!(y.is_shared_with(&x));
    assert_eq!(y.dims(), &[4]);
    assert_eq!(y.to_vec::<u64>()?, [1, 2, 3, 4]);

    Ok(())
}

#[test]
fn copy_on_default_target() -> Result<()> {
    setup_target();
    let x = setup_tensor(vec![0.5f32; 1024], &[32, 32])?;

    let mut y = Tensor::new();
    y.copy_data_from(&x)?;

    assert_eq!(y.target(), x.target());
    assert_eq!(y.to_vec::<f32>()?, vec![0.5f32; 1024]);

    Ok(())
}

#[test]
fn large_copy_is_exact() -> Result<()> {
    setup_host();
    let values: Vec<u32> = (0..(1 << 19)).collect();
    let x = setup_tensor(values.clone(), &[1 << 19])?;

    let mut y = Tensor::new();
    y.copy_data_from(&x)?;

    assert_eq!(&*y.data::<u32>()?, &values[..]);

    Ok(())
}
