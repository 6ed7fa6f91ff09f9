use litetensor_core::{
    ddim::{
        flatten_to_1d, flatten_to_2d, product, slice_dims, try_flatten_to_2d, try_product, try_slice_dims, DDim,
    },
    error::{Error, Result},
};

#[test]
fn slice() -> Result<()> {
    let dims = DDim::from([2, 3, 4]);

    let sliced = slice_dims(&dims, 1, 3);
    assert_eq!(sliced.len(), 2);
    assert_eq!(sliced, [3, 4]);

    assert_eq!(slice_dims(&dims, 0, 0).len(), 0);
    assert_eq!(slice_dims(&dims, 0, 3), dims);

    Ok(())
}

#[test]
fn slice_out_of_range() -> Result<()> {
    let dims = [2, 3, 4];

    assert!(matches!(
        try_slice_dims(&dims, 2, 4),
        Err(Error::SliceOutOfRange { begin: 2, end: 4, ndim: 3 })
    ));
    assert!(matches!(try_slice_dims(&dims, 2, 1), Err(Error::SliceOutOfRange { .. })));

    Ok(())
}

#[test]
#[should_panic]
fn slice_panics_past_end() {
    slice_dims(&[2, 3], 1, 5);
}

#[test]
fn product_of_extents() -> Result<()> {
    assert_eq!(product(&[]), 1);
    assert_eq!(product(&[2, 3, 4]), 24);
    assert_eq!(product(&slice_dims(&[2, 3, 4], 1, 3)), 12);

    let dims = DDim::from([5, 0, 7]);
    assert_eq!(product(&dims[1..]), 0);
    assert_eq!(product(&dims[..1]), 5);

    Ok(())
}

#[test]
fn flatten() -> Result<()> {
    let dims = [2, 3, 4];

    assert_eq!(flatten_to_2d(&dims, 1), [2, 12]);
    assert_eq!(flatten_to_2d(&dims, 0), [1, 24]);
    assert_eq!(flatten_to_2d(&dims, 3), [24, 1]);
    assert_eq!(flatten_to_1d(&dims), [24]);

    assert!(matches!(try_flatten_to_2d(&dims, 4), Err(Error::SliceOutOfRange { .. })));

    Ok(())
}

#[test]
fn construction() -> Result<()> {
    let dims = DDim::try_new(vec![4, 1, 8])?;
    assert_eq!(dims.numel(), 32);
    assert_eq!(dims[2], 8);
    assert_eq!(dims.to_string(), "[4, 1, 8]");

    assert!(matches!(DDim::try_new(vec![3, -1]), Err(Error::InvalidShape { .. })));

    let scalar = DDim::scalar();
    assert!(scalar.is_empty());
    assert_eq!(scalar.numel(), 1);
    assert_eq!(scalar.to_string(), "[]");

    Ok(())
}

#[test]
#[should_panic]
fn negative_extent_panics() {
    DDim::new(vec![2, -3]);
}

#[cfg(feature = "serde")]
#[test]
fn serde_round_trip() -> Result<()> {
    let dims = DDim::from([2, 3, 4]);
    let json = serde_json::to_string(&dims).map_err(|e| Error::InvalidArgument(e.to_string()))?;
    let back: DDim = serde_json::from_str(&json).map_err(|e| Error::InvalidArgument(e.to_string()))?;

    assert_eq!(back, dims);

    Ok(())
}

#[test]
fn checked_element_count() -> Result<()> {
    assert_eq!(try_product(&[2, 3, 4])?, 24);
    assert_eq!(try_product(&[])?, 1);
    assert!(matches!(try_product(&[1i64 << 62, 4]), Err(Error::InvalidShape { .. })));

    let dims = DDim::from([1i64 << 62, 4]);
    assert!(matches!(dims.try_numel(), Err(Error::InvalidShape { .. })));
    assert_eq!(dims.numel(), usize::MAX);
    assert_eq!(DDim::from([3, 5]).try_numel()?, 15);

    Ok(())
}
