//! Fixed-length resource count vectors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::SimError;

/// Ordered counts, one entry per resource type.
///
/// Every binary operation checks that both sides describe the same number of
/// resource types and fails with [`SimError::DimensionMismatch`] otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVector(Vec<u32>);

impl ResourceVector {
    /// Wrap raw counts.
    pub const fn new(counts: Vec<u32>) -> Self {
        Self(counts)
    }

    /// All-zero vector with `len` resource types.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    /// Number of resource types.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the vector describes no resource types at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every count is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// Raw counts.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    fn check_len(&self, other: &Self) -> Result<(), SimError> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(SimError::DimensionMismatch {
                expected: self.len(),
                actual: other.len(),
            })
        }
    }

    /// Componentwise `self <= other`.
    pub fn fits_within(&self, other: &Self) -> Result<bool, SimError> {
        self.check_len(other)?;
        Ok(self.0.iter().zip(&other.0).all(|(a, b)| a <= b))
    }

    /// Componentwise sum.
    pub fn checked_add(&self, other: &Self) -> Result<Self, SimError> {
        self.check_len(other)?;
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| a.checked_add(*b).ok_or(SimError::ResourceOverflow))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Componentwise difference; fails if any component would go negative.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, SimError> {
        self.check_len(other)?;
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| a.checked_sub(*b).ok_or(SimError::ResourceUnderflow))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<Vec<u32>> for ResourceVector {
    fn from(counts: Vec<u32>) -> Self {
        Self(counts)
    }
}

impl<const N: usize> From<[u32; N]> for ResourceVector {
    fn from(counts: [u32; N]) -> Self {
        Self(counts.to_vec())
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for count in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{count}")?;
            first = false;
        }
        Ok(())
    }
}
