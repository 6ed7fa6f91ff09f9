use crate::error::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref};

/// Level-of-detail: nested segment offsets over a tensor's outermost dimension.
///
/// Each level is an offset table starting at `0`. The last offset of level `i`
/// equals the number of segments in level `i + 1`, and the lowest level indexes
/// rows of the tensor itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoD(Vec<Vec<usize>>);

impl LoD {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn num_levels(&self) -> usize {
        self.0.len()
    }

    pub fn level(&self, level: usize) -> Option<&[usize]> {
        self.0.get(level).map(Vec::as_slice)
    }

    pub fn push_level(&mut self, offsets: Vec<usize>) {
        self.0.push(offsets);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn into_inner(self) -> Vec<Vec<usize>> {
        self.0
    }

    /// Validates the offset tables, optionally against the height of the tensor
    /// they segment.
    pub fn check(&self, first_dim: Option<usize>) -> Result<()> {
        for (i, level) in self.0.iter().enumerate() {
            if level.len() < 2 {
                return Err(Error::InvalidLoD(format!("level {} has fewer than two offsets", i)));
            }
            if level[0] != 0 {
                return Err(Error::InvalidLoD(format!("level {} does not start at 0", i)));
            }
            if level.windows(2).any(|w| w[0] > w[1]) {
                return Err(Error::InvalidLoD(format!("level {} is not non-decreasing", i)));
            }
        }

        for (i, pair) in self.0.windows(2).enumerate() {
            let (upper, lower) = (&pair[0], &pair[1]);
            let last = upper[upper.len() - 1];
            if last != lower.len() - 1 {
                return Err(Error::InvalidLoD(format!(
                    "level {} ends at {} but level {} has {} segments",
                    i,
                    last,
                    i + 1,
                    lower.len() - 1
                )));
            }
        }

        if let (Some(height), Some(lowest)) = (first_dim, self.0.last()) {
            let end = lowest[lowest.len() - 1];
            if end > height {
                return Err(Error::InvalidLoD(format!(
                    "lowest level ends at {} past the tensor height {}",
                    end, height
                )));
            }
        }

        Ok(())
    }

    /// Half-open `(start, end)` range of segment `elem` in `level`.
    pub fn lod_element(&self, level: usize, elem: usize) -> Result<(usize, usize)> {
        let offsets = self.level(level).ok_or_else(|| {
            Error::InvalidLoD(format!("level {} requested, LoD has {} levels", level, self.num_levels()))
        })?;
        if elem + 1 >= offsets.len() {
            return Err(Error::InvalidLoD(format!(
                "segment {} requested, level {} has {} segments",
                elem,
                level,
                offsets.len().saturating_sub(1)
            )));
        }
        Ok((offsets[elem], offsets[elem + 1]))
    }

    /// Length-based form: each level lists segment sizes instead of offsets.
    pub fn to_lengths(&self) -> Vec<Vec<usize>> {
        self.0
            .iter()
            .map(|level| level.windows(2).map(|w| w[1] - w[0]).collect())
            .collect()
    }

    pub fn from_lengths(lengths: &[Vec<usize>]) -> Self {
        let levels = lengths
            .iter()
            .map(|level| {
                let mut offsets = Vec::with_capacity(level.len() + 1);
                offsets.push(0);
                let mut acc = 0;
                for len in level {
                    acc += len;
                    offsets.push(acc);
                }
                offsets
            })
            .collect();
        Self(levels)
    }

    /// Rewrites every level in terms of the lowest level's offsets, so each
    /// level indexes tensor rows directly.
    pub fn to_absolute(&self) -> Result<Self> {
        self.check(None)?;

        let mut result = self.0.clone();
        for i in (0..result.len().saturating_sub(1)).rev() {
            let (upper, lower) = result.split_at_mut(i + 1);
            let lower = &lower[0];
            for offset in upper[i].iter_mut() {
                *offset = lower[*offset];
            }
        }
        Ok(Self(result))
    }
}

impl Deref for LoD {
    type Target = [Vec<usize>];

    fn deref(&self) -> &[Vec<usize>] {
        &self.0
    }
}

impl From<Vec<Vec<usize>>> for LoD {
    fn from(levels: Vec<Vec<usize>>) -> Self {
        Self(levels)
    }
}

impl fmt::Display for LoD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, level) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{{")?;
            for (j, offset) in level.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", offset)?;
            }
            write!(f, "}}")?;
        }
        write!(f, "}}")
    }
}
