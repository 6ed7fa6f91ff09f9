mod utils;

use litetensor_core::{
    dtype::Element,
    error::{Error, Result},
    storage::Storage,
    target::Target,
};
use std::{mem, sync::Arc};
use utils::{sample, setup_storage};

mod test_functions {
    use super::*;

    pub fn view_test<T: Element + From<u8> + PartialEq>() -> Result<()> {
        let values = sample::<T>(17);
        let storage = setup_storage(&values)?;

        assert_eq!(storage.capacity(), 17 * mem::size_of::<T>());
        assert_eq!(&*storage.view::<T>(17)?, &values[..]);
        assert!(matches!(storage.view::<T>(18), Err(Error::InsufficientCapacity { .. })));

        Ok(())
    }

    pub fn to_vec_test<T: Element + From<u8> + PartialEq>() -> Result<()> {
        let values = sample::<T>(9);
        let storage = setup_storage(&values)?;

        let copy = Storage::new();
        copy.copy_from(&storage)?;
        storage.view_mut::<T>(9)?[0] = T::default();

        assert_eq!(copy.to_vec::<T>(9)?, values);
        assert_eq!(copy.to_vec::<T>(4)?, values[..4]);

        Ok(())
    }
}

test_element_types!(view, to_vec);

#[test]
fn starts_unbound() -> Result<()> {
    let storage = Storage::new();

    assert!(!storage.is_initialized());
    assert_eq!(storage.capacity(), 0);
    assert_eq!(storage.target()?, None);
    assert!(matches!(storage.view::<u8>(0), Err(Error::NotInitialized)));

    Ok(())
}

#[test]
fn reset_lazy_grows_only() -> Result<()> {
    let storage = Storage::new();

    storage.reset_lazy(Target::Host, 64)?;
    assert!(storage.is_initialized());
    assert_eq!(storage.capacity(), 64);

    storage.reset_lazy(Target::Host, 16)?;
    assert_eq!(storage.capacity(), 64);

    storage.reset_lazy(Target::Host, 65)?;
    assert_eq!(storage.capacity(), 65);

    Ok(())
}

#[test]
fn failed_reset_keeps_buffer() -> Result<()> {
    let storage = Storage::new();
    storage.reset_lazy(Target::Host, 8)?;
    storage.view_mut::<u8>(8)?.copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

    assert!(storage.reset_lazy(Target::Host, usize::MAX).is_err());
    assert_eq!(storage.capacity(), 8);
    assert_eq!(storage.to_vec::<u8>(8)?, [1, 2, 3, 4, 5, 6, 7, 8]);

    Ok(())
}

#[test]
fn views_check_capacity() -> Result<()> {
    let storage = Storage::new();
    storage.reset_lazy(Target::Host, 10)?;

    assert_eq!(storage.view::<u16>(5)?.len(), 5);
    assert!(matches!(
        storage.view::<u32>(3),
        Err(Error::InsufficientCapacity { required: 12, capacity: 10 })
    ));

    Ok(())
}

#[test]
fn writer_excludes_readers() -> Result<()> {
    let storage = Arc::new(Storage::new());
    storage.reset_lazy(Target::Host, 4)?;

    let writer = storage.view_mut::<u8>(4)?;
    assert!(matches!(storage.view::<u8>(4), Err(Error::BufferLocked)));
    assert!(matches!(storage.reset_lazy(Target::Host, 8), Err(Error::BufferLocked)));
    drop(writer);

    let a = storage.view::<u8>(4)?;
    let b = storage.view::<u8>(2)?;
    assert_eq!(a.len() + b.len(), 6);

    Ok(())
}

#[test]
fn copy_from_storage() -> Result<()> {
    let src = Storage::new();
    src.reset_lazy(Target::Host, 12)?;
    src.copy_from_slice(&[1.5f32, -2.0, 3.25])?;

    let dst = Storage::new();
    dst.copy_from(&src)?;

    assert_eq!(dst.capacity(), 12);
    assert_eq!(dst.target()?, Some(Target::Host));
    assert_eq!(&*dst.view::<f32>(3)?, &[1.5, -2.0, 3.25]);

    assert!(matches!(dst.copy_from(&Storage::new()), Err(Error::NotInitialized)));

    Ok(())
}

#[cfg(feature = "cuda")]
#[test]
fn cuda_round_trip() -> Result<()> {
    let storage = Storage::new();
    storage.reset_lazy(Target::Cuda(0), 16)?;
    storage.copy_from_slice(&[1u32, 2, 3, 4])?;

    assert!(matches!(storage.view::<u32>(4), Err(Error::NotHostAccessible(_))));

    let copy = Storage::new();
    copy.copy_from(&storage)?;
    assert_eq!(copy.target()?, Some(Target::Cuda(0)));
    assert_eq!(copy.to_vec::<u32>(4)?, [1, 2, 3, 4]);

    Ok(())
}
