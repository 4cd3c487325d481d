#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
//! Decision-based Boundary Attack (Brendel et al., 2018) against black-box
//! classifiers that only expose hard labels.
//!
//! The attack runs in two phases per example: an initialization that
//! rejection-samples a uniformly random adversarial point, and a walk along
//! the decision boundary that pulls that point back toward the original input.
extern crate ndarray;
extern crate ndarray_rand;
extern crate ndarray_stats;
extern crate num;
extern crate rand;
extern crate serde;

pub mod boundary;
pub mod classifier;
pub mod config;
pub mod error;
pub mod util;

#[cfg(test)]
mod test_util;

pub use boundary::{
    find_initial, walk, AttackReport, BoundaryAttack, BoundaryWalker, ExampleOutcome, Goal,
    InitOutcome, SearchState, StepOutcome,
};
pub use classifier::{Classifier, Dense, LayerKind, ReLU, Sequential};
pub use config::{AttackConfig, AttackParams};
pub use error::{AttackError, ConfigError};

use ndarray::ScalarOperand;
use ndarray_rand::rand_distr::{Distribution, StandardNormal};
use num::Float;
use rand::distributions::uniform::SampleUniform;
use rand::Rng;
use std::fmt::{Debug, Display};

/// Class identifier produced by taking the arg-max of a classifier's scores
pub type Label = usize;

/// Scalar type of a sample.
///
/// Every array built while attacking an example (random draws, perturbations,
/// candidates) uses the element type of the input, so an `f32` image stays
/// `f32` all the way to the classifier.
pub trait Element:
    Float + SampleUniform + ScalarOperand + Debug + Display + Send + Sync + 'static
{
    fn from_f64_lossy(value: f64) -> Self;

    fn into_f64(self) -> f64;

    fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl Element for f64 {
    fn from_f64_lossy(value: f64) -> Self {
        value
    }

    fn into_f64(self) -> f64 {
        self
    }

    fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardNormal.sample(rng)
    }
}

impl Element for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_f64_lossy(value: f64) -> Self {
        value as Self
    }

    fn into_f64(self) -> f64 {
        f64::from(self)
    }

    fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardNormal.sample(rng)
    }
}
