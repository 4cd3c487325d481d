use crate::classifier::{Classifier, Dense, Layer, LayerKind};
use crate::error::AttackError;
use crate::Element;
use ndarray::{Array1, Array2, ArrayViewD, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Feed-forward network whose last layer emits class scores.
///
/// Samples of any shape are flattened in row-major order before the first
/// layer, so an image batch `(n, c, h, w)` is seen as `(n, c * h * w)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sequential {
    layers: Vec<LayerKind>,
    clip_values: (f64, f64),
}

impl Sequential {
    pub const fn new(clip_values: (f64, f64)) -> Self {
        Self {
            layers: vec![],
            clip_values,
        }
    }

    /// Single affine layer scoring `weights.nrows()` classes.
    pub fn linear(weights: Array2<f64>, bias: Array1<f64>, clip_values: (f64, f64)) -> Self {
        Self::new(clip_values).with_layer(Dense::new(weights, bias))
    }

    pub fn add_layer<L: Into<LayerKind>>(&mut self, layer: L) {
        self.layers.push(layer.into());
    }

    #[must_use]
    pub fn with_layer<L: Into<LayerKind>>(mut self, layer: L) -> Self {
        self.add_layer(layer);
        self
    }

    pub fn num_classes(&self) -> Option<usize> {
        self.layers.iter().rev().find_map(Layer::output_dim)
    }

    /// Checks that samples of `width` elements flow through every layer.
    ///
    /// # Errors
    /// The first layer whose input width differs from what reaches it.
    pub fn check_chain(&self, width: usize) -> Result<(), AttackError> {
        let mut repr_width = width;
        for (i, layer) in self.layers.iter().enumerate() {
            if let Some(expected) = layer.input_dim() {
                if expected != repr_width {
                    return Err(AttackError::Oracle(format!(
                        "layer {} ({}) expects {} inputs, got {}",
                        i, layer, expected, repr_width
                    )));
                }
            }
            repr_width = layer.output_dim().unwrap_or(repr_width);
        }
        Ok(())
    }

    /// # Panics
    /// If the layers do not chain, see `check_chain`.
    pub fn forward(&self, input: Array2<f64>) -> Array2<f64> {
        self.layers
            .iter()
            .fold(input, |repr, layer| layer.forward2(&repr))
    }
}

impl<A: Element> Classifier<A> for Sequential {
    fn predict(&self, batch: ArrayViewD<A>) -> Result<Array2<f64>, AttackError> {
        if batch.ndim() == 0 {
            return Err(AttackError::InvalidBatchRank(0));
        }
        let num_examples = batch.len_of(Axis(0));
        let width: usize = batch.shape()[1..].iter().product();
        self.check_chain(width)?;
        let input = Array2::from_shape_vec(
            (num_examples, width),
            batch.iter().map(|&x| x.into_f64()).collect(),
        )?;
        Ok(self.forward(input))
    }

    fn clip_values(&self) -> (A, A) {
        (
            A::from_f64_lossy(self.clip_values.0),
            A::from_f64_lossy(self.clip_values.1),
        )
    }
}

impl fmt::Display for Sequential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let layers: Vec<String> = self.layers.iter().map(ToString::to_string).collect();
        write!(f, "{}", layers.join(" => "))
    }
}
