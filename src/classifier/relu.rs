use crate::classifier::Layer;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ReLU {
    ndims: usize,
}

impl ReLU {
    pub const fn new(ndims: usize) -> Self {
        Self { ndims }
    }
}

impl Display for ReLU {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "ReLU")
    }
}

impl Layer for ReLU {
    fn input_dim(&self) -> Option<usize> {
        Some(self.ndims)
    }

    fn output_dim(&self) -> Option<usize> {
        Some(self.ndims)
    }

    fn forward2(&self, input: &Array2<f64>) -> Array2<f64> {
        input.mapv(|x| if x.lt(&0.) { 0. } else { x })
    }
}
