use crate::error::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref};

/// Logical shape of a tensor: one non-negative extent per axis, outermost first.
///
/// An empty `DDim` describes a scalar and holds one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DDim(Vec<i64>);

impl DDim {
    /// Runs [`try_new`](Self::try_new) and panics on a negative extent.
    pub fn new(dims: Vec<i64>) -> Self {
        Self::try_new(dims).expect("failed to create DDim")
    }

    pub fn try_new(dims: Vec<i64>) -> Result<Self> {
        if let Some((axis, &extent)) = dims.iter().enumerate().find(|(_, d)| **d < 0) {
            return Err(Error::InvalidShape {
                message: format!("extent {} at axis {} is negative", extent, axis),
            });
        }
        Ok(Self(dims))
    }

    pub fn scalar() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<i64> {
        self.0.clone()
    }

    pub fn into_vec(self) -> Vec<i64> {
        self.0
    }

    /// Element count as `usize`, saturating at `usize::MAX` when the extents
    /// overflow. Sizing paths use [`try_numel`](Self::try_numel).
    pub fn numel(&self) -> usize {
        self.try_numel().unwrap_or(usize::MAX)
    }

    /// Element count as `usize`, or `InvalidShape` when the product of the
    /// extents does not fit.
    pub fn try_numel(&self) -> Result<usize> {
        let count = try_product(&self.0)?;
        usize::try_from(count).map_err(|_| Error::InvalidShape {
            message: format!("element count of {} does not fit in usize", self),
        })
    }
}

impl Deref for DDim {
    type Target = [i64];

    fn deref(&self) -> &[i64] {
        &self.0
    }
}

impl From<Vec<i64>> for DDim {
    fn from(dims: Vec<i64>) -> Self {
        Self::new(dims)
    }
}

impl From<&[i64]> for DDim {
    fn from(dims: &[i64]) -> Self {
        Self::new(dims.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for DDim {
    fn from(dims: [i64; N]) -> Self {
        Self::new(dims.to_vec())
    }
}

impl From<&DDim> for DDim {
    fn from(dims: &DDim) -> Self {
        dims.clone()
    }
}

impl PartialEq<[i64]> for DDim {
    fn eq(&self, other: &[i64]) -> bool {
        self.0 == other
    }
}

impl<const N: usize> PartialEq<[i64; N]> for DDim {
    fn eq(&self, other: &[i64; N]) -> bool {
        self.0 == other
    }
}

impl fmt::Display for DDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

/// Runs [`try_slice_dims`] and panics when `[begin, end)` is out of range.
pub fn slice_dims(dims: &[i64], begin: usize, end: usize) -> DDim {
    try_slice_dims(dims, begin, end).expect("failed to slice dims")
}

/// Returns the axes `[begin, end)` of `dims` as a new shape.
pub fn try_slice_dims(dims: &[i64], begin: usize, end: usize) -> Result<DDim> {
    if begin > end || end > dims.len() {
        return Err(Error::SliceOutOfRange {
            begin,
            end,
            ndim: dims.len(),
        });
    }
    Ok(DDim(dims[begin..end].to_vec()))
}

/// Product of all extents; `1` for an empty range.
///
/// Pass a sub-slice (`&dims[a..b]`) to fold over part of a shape.
pub fn product(dims: &[i64]) -> i64 {
    dims.iter().product()
}

/// Checked [`product`], returning `InvalidShape` on overflow.
pub fn try_product(dims: &[i64]) -> Result<i64> {
    dims.iter()
        .try_fold(1i64, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| Error::InvalidShape {
            message: format!("element count of {:?} overflows", dims),
        })
}

/// Runs [`try_flatten_to_2d`] and panics when `col` is past the last axis.
pub fn flatten_to_2d(dims: &[i64], col: usize) -> DDim {
    try_flatten_to_2d(dims, col).expect("failed to flatten dims to 2d")
}

/// Reinterprets `dims` as a matrix `[product(dims[..col]), product(dims[col..])]`.
pub fn try_flatten_to_2d(dims: &[i64], col: usize) -> Result<DDim> {
    let rows = try_slice_dims(dims, 0, col)?;
    let cols = try_slice_dims(dims, col, dims.len())?;
    Ok(DDim(vec![product(&rows), product(&cols)]))
}

pub fn flatten_to_1d(dims: &[i64]) -> DDim {
    DDim(vec![product(dims)])
}
