//! Utility functions
use crate::Element;
use ndarray::{ArrayBase, ArrayViewD, Data, Dimension, Zip};

pub fn l2_norm<A: Element, S: Data<Elem = A>, D: Dimension>(x: &ArrayBase<S, D>) -> A {
    x.fold(A::zero(), |acc, &v| acc + v * v).sqrt()
}

/// Euclidean distance between two equally shaped arrays
///
/// # Panics
/// If the shapes differ
pub fn l2_distance<A: Element>(x: &ArrayViewD<A>, y: &ArrayViewD<A>) -> A {
    Zip::from(x)
        .and(y)
        .fold(A::zero(), |acc, &a, &b| acc + (a - b) * (a - b))
        .sqrt()
}

pub fn dot<A: Element>(x: &ArrayViewD<A>, y: &ArrayViewD<A>) -> A {
    Zip::from(x).and(y).fold(A::zero(), |acc, &a, &b| acc + a * b)
}

pub fn clip_inplace<A: Element, S: ndarray::DataMut<Elem = A>, D: Dimension>(
    x: &mut ArrayBase<S, D>,
    min: A,
    max: A,
) {
    x.mapv_inplace(|v| v.max(min).min(max));
}
