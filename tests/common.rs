use boundary_attack::{Dense, ReLU, Sequential};
use ndarray::{array, Array};
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use rand::Rng;

pub fn dense<R: Rng>(in_dim: usize, out_dim: usize, rng: &mut R) -> Dense {
    let dist = Normal::new(0., 1.).unwrap();
    Dense::new(
        Array::random_using((out_dim, in_dim), dist, rng),
        Array::random_using(out_dim, dist, rng),
    )
}

/// Fully connected ReLU network over the unit box
pub fn make_classifier<R: Rng>(shape: &[usize], num_classes: usize, rng: &mut R) -> Sequential {
    assert!(!shape.is_empty());
    let mut clf = Sequential::new((0., 1.));
    for pair in shape.windows(2) {
        clf.add_layer(dense(pair[0], pair[1], rng));
        clf.add_layer(ReLU::new(pair[1]));
    }
    clf.add_layer(dense(*shape.last().unwrap(), num_classes, rng));
    clf
}

/// Two classes on the unit square split by `x0 + x1 = 0.25`, class 1 above
pub fn diagonal_classifier() -> Sequential {
    Sequential::linear(array![[-1., -1.], [1., 1.]], array![0.25, -0.25], (0., 1.))
}
