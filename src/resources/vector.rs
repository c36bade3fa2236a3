/*!
 * Resource Vectors
 * Per-class resource counts with component-wise arithmetic
 */

use crate::core::errors::ResourceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Count of units per resource class
///
/// The number of classes is fixed when the ledger is built; every vector
/// handed to the ledger is checked against it before any arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVector(Vec<u32>);

impl ResourceVector {
    /// Vector of `classes` zeros
    pub fn zeros(classes: usize) -> Self {
        Self(vec![0; classes])
    }

    #[inline]
    pub fn classes(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0)
    }

    /// Component-wise `self <= other`
    pub fn fits_within(&self, other: &ResourceVector) -> bool {
        self.0.len() == other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a <= b)
    }

    /// Component-wise subtraction, `None` if any class would go negative
    pub fn checked_sub(&self, other: &ResourceVector) -> Option<ResourceVector> {
        if self.0.len() != other.0.len() {
            return None;
        }
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| a.checked_sub(*b))
            .collect::<Option<Vec<_>>>()
            .map(ResourceVector)
    }

    /// Component-wise minimum
    pub fn min(&self, other: &ResourceVector) -> ResourceVector {
        ResourceVector(self.0.iter().zip(&other.0).map(|(a, b)| *a.min(b)).collect())
    }

    pub fn add_assign(&mut self, other: &ResourceVector) {
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a = a.saturating_add(*b);
        }
    }

    /// Subtract `other`, which must fit within `self`
    pub fn sub_assign(&mut self, other: &ResourceVector) {
        debug_assert!(other.fits_within(self), "resource vector underflow");
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a = a.saturating_sub(*b);
        }
    }

    pub(crate) fn ensure_classes(&self, expected: usize) -> Result<(), ResourceError> {
        if self.0.len() == expected {
            Ok(())
        } else {
            Err(ResourceError::DimensionMismatch {
                expected,
                actual: self.0.len(),
            })
        }
    }
}

impl<const N: usize> From<[u32; N]> for ResourceVector {
    fn from(values: [u32; N]) -> Self {
        Self(values.to_vec())
    }
}

impl From<Vec<u32>> for ResourceVector {
    fn from(values: Vec<u32>) -> Self {
        Self(values)
    }
}

impl From<&[u32]> for ResourceVector {
    fn from(values: &[u32]) -> Self {
        Self(values.to_vec())
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", v)?;
        }
        f.write_str(")")
    }
}
