use crate::classifier::Layer;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Affine layer `f(x) = Wx + b`
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Dense {
    basis: Array2<f64>,
    shift: Array1<f64>,
}

impl Dense {
    /// Shapes are only checked in debug builds. `Sequential` checks how
    /// layers chain before running them.
    pub fn new(basis: Array2<f64>, shift: Array1<f64>) -> Self {
        debug_assert_eq!(basis.nrows(), shift.len());
        Self { basis, shift }
    }

    pub fn basis(&self) -> &Array2<f64> {
        &self.basis
    }

    pub fn shift(&self) -> &Array1<f64> {
        &self.shift
    }
}

impl Layer for Dense {
    fn input_dim(&self) -> Option<usize> {
        Some(self.basis.ncols())
    }

    fn output_dim(&self) -> Option<usize> {
        Some(self.shift.len())
    }

    fn forward2(&self, input: &Array2<f64>) -> Array2<f64> {
        debug_assert_eq!(input.ncols(), self.basis.ncols());
        input.dot(&self.basis.t()) + &self.shift
    }
}

impl fmt::Display for Dense {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Dense {} -> {}", self.basis.ncols(), self.shift.len())
    }
}
