use crate::classifier::{Dense, ReLU};
use enum_dispatch::enum_dispatch;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layers are stateless: identical inputs give identical outputs.
/// Inputs are `(num_examples, width)`.
#[enum_dispatch]
pub trait Layer {
    fn input_dim(&self) -> Option<usize> {
        None
    }

    fn output_dim(&self) -> Option<usize> {
        None
    }

    fn forward2(&self, input: &Array2<f64>) -> Array2<f64>;
}

#[enum_dispatch(Layer)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LayerKind {
    Dense,
    ReLU,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Dense(dense) => write!(f, "{}", dense),
            Self::ReLU(relu) => write!(f, "{}", relu),
        }
    }
}
