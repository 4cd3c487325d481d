//! Rejection sampling of a first adversarial point
use crate::boundary::{check_clip_values, Goal};
use crate::classifier::Classifier;
use crate::config::AttackConfig;
use crate::error::AttackError;
use crate::{Element, Label};
use log::{info, warn};
use ndarray::{ArrayD, ArrayViewD, Axis};
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::Rng;

/// Result of searching for a starting point of the walk
#[derive(Clone, Debug, PartialEq)]
pub enum InitOutcome<A> {
    /// A uniformly drawn sample whose label satisfies the goal
    Found(ArrayD<A>),
    /// Targeted attack on an input already predicted as the target, nothing to do
    Satisfied,
    /// Every one of the `init_size` draws failed the goal
    NotFound,
}

/// Draws up to `config.init_size()` samples uniformly from the clip box and
/// returns the first one whose predicted label satisfies the goal.
///
/// `x` is only used for its shape. `target` is the target label of a targeted
/// attack and `None` for an untargeted one, in which case any label other than
/// `y_predicted` is adversarial. Each draw costs one classifier query.
///
/// # Errors
/// Invalid clip values or a failing classifier.
pub fn find_initial<A, C, R>(
    classifier: &C,
    x: ArrayViewD<A>,
    target: Option<Label>,
    y_predicted: Label,
    clip_values: (A, A),
    config: &AttackConfig,
    rng: &mut R,
) -> Result<InitOutcome<A>, AttackError>
where
    A: Element,
    C: Classifier<A> + ?Sized,
    R: Rng + ?Sized,
{
    let (clip_min, clip_max) = clip_values;
    check_clip_values(clip_min, clip_max)?;
    if target == Some(y_predicted) {
        return Ok(InitOutcome::Satisfied);
    }
    let goal = Goal::new(target, y_predicted);

    let uniform = Uniform::new_inclusive(clip_min, clip_max);
    for trial in 0..config.init_size() {
        let random_sample = ArrayD::random_using(x.raw_dim(), &uniform, rng);
        let random_class =
            classifier.predict_labels(random_sample.view().insert_axis(Axis(0)))?[0];
        if goal.is_adversarial(random_class) {
            info!(
                "Found initial adversarial sample for {} attack after {} trials.",
                goal,
                trial + 1
            );
            return Ok(InitOutcome::Found(random_sample));
        }
    }
    warn!(
        "Failed to draw a random sample that is adversarial after {} trials, attack failed.",
        config.init_size()
    );
    Ok(InitOutcome::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Sequential;
    use crate::config::AttackParams;
    use crate::test_util::*;
    use ndarray::{array, Array1, Array2};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn config(init_size: usize) -> AttackConfig {
        AttackConfig::default()
            .update(&AttackParams::default().init_size(init_size))
            .unwrap()
    }

    #[test]
    fn test_untargeted_finds_other_class() {
        let clf = diagonal_classifier();
        let x = array![0.1, 0.1].into_dyn();
        let mut rng = Pcg64::seed_from_u64(7);
        let outcome = find_initial(&clf, x.view(), None, 0, (0., 1.), &config(50), &mut rng)
            .unwrap();
        match outcome {
            InitOutcome::Found(sample) => {
                assert_eq!(sample.shape(), x.shape());
                assert!(sample.iter().all(|&v| (0. ..=1.).contains(&v)));
                let label = clf
                    .predict_labels(sample.view().insert_axis(Axis(0)))
                    .unwrap()[0];
                assert_eq!(label, 1);
            }
            other => panic!("expected a sample, got {:?}", other),
        }
    }

    #[test]
    fn test_targeted_already_satisfied() {
        let clf = diagonal_classifier();
        let x = array![0.9, 0.9].into_dyn();
        let mut rng = Pcg64::seed_from_u64(0);
        let outcome =
            find_initial(&clf, x.view(), Some(1), 1, (0., 1.), &config(10), &mut rng).unwrap();
        assert_eq!(outcome, InitOutcome::Satisfied);
    }

    #[test]
    fn test_unreachable_target_exhausts() {
        // Class 2 never wins
        let clf = Sequential::linear(
            array![[1., 0.], [0., 1.], [0., 0.]],
            array![0., 0., -100.],
            (0., 1.),
        );
        let x = array![0.5, 0.2].into_dyn();
        let mut rng = Pcg64::seed_from_u64(3);
        let outcome =
            find_initial(&clf, x.view(), Some(2), 0, (0., 1.), &config(25), &mut rng).unwrap();
        assert_eq!(outcome, InitOutcome::NotFound);
    }

    #[test]
    fn test_keeps_element_type() {
        let clf = Sequential::linear(Array2::eye(4), Array1::zeros(4), (0., 1.));
        let x = Array2::<f32>::zeros((2, 2)).into_dyn();
        let mut rng = Pcg64::seed_from_u64(11);
        let outcome =
            find_initial(&clf, x.view(), Some(3), 0, (0., 1.), &config(200), &mut rng).unwrap();
        if let InitOutcome::Found(sample) = outcome {
            let sample: ArrayD<f32> = sample;
            assert_eq!(sample.shape(), &[2, 2]);
        } else {
            panic!("class 3 holds a quarter of the box");
        }
    }

    #[test]
    fn test_rejects_inverted_clip_values() {
        let clf = diagonal_classifier();
        let x = array![0.1, 0.1].into_dyn();
        let mut rng = Pcg64::seed_from_u64(0);
        let res = find_initial(&clf, x.view(), None, 0, (1., 0.), &config(5), &mut rng);
        assert!(matches!(res, Err(AttackError::InvalidClipValues { .. })));
    }
}
