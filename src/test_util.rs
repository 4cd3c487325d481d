#![cfg(test)]
use crate::classifier::{Dense, ReLU, Sequential};
use crate::config::AttackParams;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::Axis;
use proptest::arbitrary::functor::ArbitraryF1;
use proptest::prelude::*;
use proptest::sample::SizeRange;

prop_compose! {
    pub fn array1(len: usize)(v in Vec::lift1_with(-10. .. 10., SizeRange::new(len..=len))) -> Array1<f64> {
        Array1::from_vec(v)
    }
}

prop_compose! {
    pub fn unit_array1(len: usize)(v in Vec::lift1_with(0. ..=1., SizeRange::new(len..=len))) -> Array1<f64> {
        Array1::from_vec(v)
    }
}

prop_compose! {
    pub fn array2(rows: usize, cols: usize)(v in Vec::lift1_with(array1(cols), SizeRange::new(rows..=rows))) -> Array2<f64> {
        assert!(rows > 0);
        ndarray::stack(Axis(0), &v.iter().map(|x| x.view()).collect::<Vec<ArrayView1<f64>>>()).unwrap()
    }
}

prop_compose! {
    pub fn dense(in_dim: usize, out_dim: usize)(basis in array2(out_dim, in_dim), shift in array1(out_dim)) -> Dense {
        Dense::new(basis, shift)
    }
}

prop_compose! {
    /// Linear classifier over the unit box
    pub fn linear_classifier(in_dim: usize, num_classes: usize)(layer in dense(in_dim, num_classes)) -> Sequential {
        Sequential::new((0., 1.)).with_layer(layer)
    }
}

prop_compose! {
    pub fn fc_classifier(input_size: usize, num_classes: usize, nlayers: usize, max_layer_width: usize)(repr_sizes in Vec::lift1_with(1..max_layer_width, SizeRange::new(nlayers..=nlayers)).prop_map(move |mut x| {x.insert(0, input_size); x.push(num_classes); x}))(layers in {let pairs = repr_sizes.iter().zip(repr_sizes.iter().skip(1)); pairs.map(|(&x, &y)| dense(x, y)).collect::<Vec<_>>()}) -> Sequential {
        let num_layers = layers.len();
        let mut clf = Sequential::new((0., 1.));
        layers.into_iter().enumerate().for_each(|(i, layer)| {
            let output_dim = layer.shift().len();
            clf.add_layer(layer);
            if i + 1 < num_layers {
                clf.add_layer(ReLU::new(output_dim));
            }
        });
        clf
    }
}

prop_compose! {
    pub fn valid_params()(
        targeted in any::<bool>(),
        delta in 1e-6..10.0_f64,
        epsilon in 1e-6..=1.0_f64,
        step_adapt in 1e-3..0.999_f64,
        max_iter in 1..1000_usize,
        sample_size in 1..100_usize,
        init_size in 1..1000_usize,
    ) -> AttackParams {
        AttackParams::default()
            .targeted(targeted)
            .delta(delta)
            .epsilon(epsilon)
            .step_adapt(step_adapt)
            .max_iter(max_iter)
            .sample_size(sample_size)
            .init_size(init_size)
    }
}

/// Two classes split by the line `x0 + x1 = 0.25`; class 1 above it.
pub fn diagonal_classifier() -> Sequential {
    Sequential::linear(
        ndarray::array![[-1., -1.], [1., 1.]],
        ndarray::array![0.25, -0.25],
        (0., 1.),
    )
}
