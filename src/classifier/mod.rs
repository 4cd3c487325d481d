//! The classifier oracle queried by the attack
//!
//! The attack only ever sees labels: it calls `predict` on a batch and takes
//! the arg-max of each score row. `Sequential` is a small feed-forward network
//! implementing the oracle, used by the tests, benchmarks and demos.
pub mod dense;
pub mod layer;
pub mod relu;
pub mod sequential;

pub use dense::Dense;
pub use layer::{Layer, LayerKind};
pub use relu::ReLU;
pub use sequential::Sequential;

use crate::error::AttackError;
use crate::{Element, Label};
use ndarray::{Array1, Array2, ArrayViewD, Axis};
use ndarray_stats::QuantileExt;

pub trait Classifier<A: Element> {
    /// Per-class scores, one row per example along axis 0 of `batch`.
    ///
    /// # Errors
    /// Implementation defined, e.g. a batch of the wrong shape.
    fn predict(&self, batch: ArrayViewD<A>) -> Result<Array2<f64>, AttackError>;

    /// Valid range `(min, max)` of every input element.
    fn clip_values(&self) -> (A, A);

    /// # Errors
    /// If `batch` has no example axis, the score matrix does not have one row
    /// per example, or a row has no comparable maximum.
    fn predict_labels(&self, batch: ArrayViewD<A>) -> Result<Array1<Label>, AttackError> {
        if batch.ndim() == 0 {
            return Err(AttackError::InvalidBatchRank(0));
        }
        let num_examples = batch.len_of(Axis(0));
        let scores = self.predict(batch)?;
        if scores.nrows() != num_examples {
            return Err(AttackError::Oracle(format!(
                "expected {} score rows, got {}",
                num_examples,
                scores.nrows()
            )));
        }
        scores
            .rows()
            .into_iter()
            .map(|row| row.argmax_skipnan().map_err(AttackError::from))
            .collect::<Result<Vec<_>, _>>()
            .map(Array1::from)
    }
}

impl<A: Element, C: Classifier<A> + ?Sized> Classifier<A> for &C {
    fn predict(&self, batch: ArrayViewD<A>) -> Result<Array2<f64>, AttackError> {
        (**self).predict(batch)
    }

    fn clip_values(&self) -> (A, A) {
        (**self).clip_values()
    }
}
